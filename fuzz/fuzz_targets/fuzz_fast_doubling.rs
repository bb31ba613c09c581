#![no_main]

use libfuzzer_sys::fuzz_target;

use fibdrv_bignum::SystemAllocator;
use fibdrv_core::calculator::CoreCalculator;
use fibdrv_core::fastdoubling::FastDoubling;
use fibdrv_core::iterative::IterativeAddition;
use fibdrv_core::options::Options;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // Use first 4 bytes as n, capped at 10000 for speed
    let n = u64::from(u32::from_le_bytes([data[0], data[1], data[2], data[3]])) % 10_000;
    let threshold = usize::from(data.get(4).copied().unwrap_or(0)) + 1;

    let alloc = SystemAllocator::shared();
    let opts = Options {
        parallel_threshold: threshold,
        ..Options::default()
    };
    let fast = FastDoubling::new().calculate_core(n, &opts, &alloc).unwrap();
    let iterative = IterativeAddition::new()
        .calculate_core(n, &opts, &alloc)
        .unwrap();
    assert_eq!(fast, iterative, "FastDoubling != IterativeAddition at n={n}");
});
