//! Digit width and algorithm thresholds.

/// Bits per digit word.
pub const DIGIT_BITS: u32 = 64;

/// Largest digit count a `Bignum` may hold. Lengths and capacities are
/// tracked against a 32-bit counter.
pub const MAX_DIGITS: usize = u32::MAX as usize;

/// Capacity is always a multiple of this many words.
pub const CAPACITY_ROUNDING: usize = 4;

/// Operand length (in words) at which multiplication switches from
/// schoolbook to Karatsuba.
pub const KARATSUBA_MUL_THRESHOLD: usize = 32;

/// Operand length (in words) at which squaring switches to Karatsuba.
pub const KARATSUBA_SQR_THRESHOLD: usize = 64;

/// Up to this length, squaring uses the schoolbook multiplier instead of
/// the cross-product base case.
pub const BASE_SQR_THRESHOLD: usize = 10;
