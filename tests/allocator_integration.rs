//! Integration tests for digit allocation through the whole stack.

use std::sync::Arc;

use fibdrv_bignum::{BudgetAllocator, DigitAllocator};
use fibdrv_core::calculator::{Calculator, FibCalculator, FibError};
use fibdrv_core::device::{FibDevice, Whence};
use fibdrv_core::fastdoubling::FastDoubling;
use fibdrv_core::options::Options;

#[test]
fn computation_returns_every_word() {
    let budget = Arc::new(BudgetAllocator::new(0));
    let alloc: Arc<dyn DigitAllocator> = budget.clone();
    let calc = FibCalculator::new(Arc::new(FastDoubling::new()));

    // F(10000) has 2090 digits and is well past the Karatsuba thresholds.
    let value = calc.calculate(10_000, &Options::default(), &alloc).unwrap();
    assert_eq!(value.to_dec_string().unwrap().len(), 2090);

    let stats = budget.stats();
    assert!(stats.allocations > 0);
    assert!(stats.peak_words >= value.len());
    assert_eq!(stats.in_use_words, value.capacity());

    drop(value);
    assert_eq!(budget.stats().in_use_words, 0);
}

#[test]
fn device_budget_refuses_large_offsets() {
    let device = FibDevice::new(
        Arc::new(FibCalculator::new(Arc::new(FastDoubling::new()))),
        Options {
            memory_limit: 2048,
            ..Options::default()
        },
    );
    let mut session = device.open().unwrap();

    session.seek(1000, Whence::Set);
    assert!(session.read_value().is_ok());

    session.seek(200_000, Whence::Set);
    assert!(matches!(session.read_value(), Err(FibError::Bignum(_))));

    let stats = device.allocator_stats();
    assert!(stats.refusals > 0);
    assert!(stats.peak_words <= 256);
    assert_eq!(stats.in_use_words, 0);
}
