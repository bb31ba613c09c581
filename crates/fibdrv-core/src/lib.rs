//! # fibdrv-core
//!
//! Fibonacci calculators on top of `fibdrv-bignum`, and a user-space model
//! of the Fibonacci character device with its single-session, seek, and
//! timing contract.

pub mod calculator;
pub mod constants;
pub mod device;
pub mod fastdoubling;
pub mod iterative;
pub mod memory_budget;
pub mod options;
pub mod small;

// Re-exports
pub use calculator::{Calculator, CoreCalculator, FibCalculator, FibError};
pub use constants::{exit_codes, DEFAULT_PARALLEL_THRESHOLD, FIB_TABLE, MAX_FIB_U64, MAX_LENGTH};
pub use device::{FibDevice, FibSession, Whence};
pub use options::Options;

use std::sync::Arc;

use fibdrv_bignum::{Bignum, SystemAllocator};

/// Compute F(n) using the fast doubling algorithm.
///
/// This is a convenience function for simple use cases. For memory limits
/// or a custom allocator, use the `Calculator` trait directly.
///
/// # Example
/// ```
/// assert_eq!(fibdrv_core::fibonacci(10).unwrap().to_string(), "55");
/// assert_eq!(fibdrv_core::fibonacci(0).unwrap().to_string(), "0");
/// ```
pub fn fibonacci(n: u64) -> Result<Bignum, FibError> {
    let calc = FibCalculator::new(Arc::new(fastdoubling::FastDoubling::new()));
    calc.calculate(n, &Options::default(), &SystemAllocator::shared())
}
