//! Calculator traits and the `FibCalculator` decorator.
//!
//! `Calculator` is the public trait consumed by the device and the CLI.
//! `CoreCalculator` is the internal trait implemented by algorithms.
//! `FibCalculator` is a decorator that adds the `u64` fast path (n <= 93).

use std::sync::Arc;

use fibdrv_bignum::{Bignum, BignumError, DigitAllocator};

use crate::constants::MAX_FIB_U64;
use crate::options::Options;
use crate::small::fast_doubling_u64;

/// Error type for Fibonacci calculations and the device model.
#[derive(Debug, thiserror::Error)]
pub enum FibError {
    /// The bignum engine failed (allocation refused or size overflow).
    #[error("bignum error: {0}")]
    Bignum(#[from] BignumError),

    /// The device already has an open session.
    #[error("device busy")]
    Busy,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A computed value disagreed with the reference.
    #[error("result mismatch at k = {k}")]
    Mismatch {
        /// Index of the first wrong value.
        k: u64,
    },
}

/// Public trait for Fibonacci calculators.
pub trait Calculator: Send + Sync {
    /// Calculate F(n), drawing digit storage from `alloc`.
    fn calculate(
        &self,
        n: u64,
        opts: &Options,
        alloc: &Arc<dyn DigitAllocator>,
    ) -> Result<Bignum, FibError>;

    /// Get the name of this calculator.
    fn name(&self) -> &str;
}

/// Internal trait for algorithm implementations.
/// Wrapped by `FibCalculator` which adds the fast path.
pub trait CoreCalculator: Send + Sync {
    /// Perform the core calculation.
    fn calculate_core(
        &self,
        n: u64,
        opts: &Options,
        alloc: &Arc<dyn DigitAllocator>,
    ) -> Result<Bignum, FibError>;

    /// Get the name of this algorithm.
    fn name(&self) -> &str;
}

/// Decorator that wraps a `CoreCalculator` with a fast path for small n.
pub struct FibCalculator {
    inner: Arc<dyn CoreCalculator>,
}

impl FibCalculator {
    /// Create a new `FibCalculator` wrapping the given core calculator.
    #[must_use]
    pub fn new(inner: Arc<dyn CoreCalculator>) -> Self {
        Self { inner }
    }
}

impl Calculator for FibCalculator {
    fn calculate(
        &self,
        n: u64,
        opts: &Options,
        alloc: &Arc<dyn DigitAllocator>,
    ) -> Result<Bignum, FibError> {
        if n <= MAX_FIB_U64 {
            if let Some(value) = fast_doubling_u64(n) {
                return Ok(Bignum::from_u64_in(value, Arc::clone(alloc))?);
            }
        }
        self.inner.calculate_core(n, opts, alloc)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastdoubling::FastDoubling;
    use fibdrv_bignum::SystemAllocator;

    #[test]
    fn fast_path_values() {
        let calc = FibCalculator::new(Arc::new(FastDoubling::new()));
        let alloc = SystemAllocator::shared();
        let opts = Options::default();
        let f = |n| calc.calculate(n, &opts, &alloc).unwrap().to_dec_string().unwrap();
        assert_eq!(f(0), "0");
        assert_eq!(f(10), "55");
        assert_eq!(f(93), "12200160415121876738");
        assert_eq!(f(94), "19740274219868223167");
        assert_eq!(calc.name(), "FastDoubling");
    }

    #[test]
    fn fib_error_display() {
        let err = FibError::Config("bad".into());
        assert_eq!(err.to_string(), "configuration error: bad");

        let err = FibError::Mismatch { k: 7 };
        assert_eq!(err.to_string(), "result mismatch at k = 7");

        let err: FibError = BignumError::AllocationFailure { words: 4 }.into();
        assert_eq!(err.to_string(), "bignum error: allocation of 4 digit words failed");
    }
}
