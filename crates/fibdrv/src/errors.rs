//! Error handling and exit codes.

use fibdrv_core::calculator::FibError;
use fibdrv_core::constants::exit_codes;

/// Exit code for a calculation or device error.
pub fn handle_error(err: &FibError) -> i32 {
    match err {
        FibError::Bignum(_) => exit_codes::ERROR_GENERIC,
        FibError::Busy => exit_codes::ERROR_BUSY,
        FibError::Config(_) => exit_codes::ERROR_CONFIG,
        FibError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<FibError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibdrv_bignum::BignumError;

    #[test]
    fn error_codes() {
        assert_eq!(handle_error(&FibError::Mismatch { k: 5 }), 3);
        assert_eq!(handle_error(&FibError::Config("bad".into())), 4);
        assert_eq!(handle_error(&FibError::Busy), 16);
        assert_eq!(
            handle_error(&FibError::Bignum(BignumError::AllocationFailure { words: 1 })),
            1
        );
    }

    #[test]
    fn anyhow_errors_are_downcast() {
        let err = anyhow::Error::from(FibError::Mismatch { k: 9 });
        assert_eq!(exit_code(&err), 3);
        assert_eq!(exit_code(&anyhow::anyhow!("io")), 1);
    }
}
