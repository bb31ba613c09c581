//! # fibdrv-bignum
//!
//! Arbitrary-precision signed integers over base-2^64 digits, with
//! Karatsuba multiplication and squaring, left shifts, and decimal
//! conversion.
//!
//! The digit-level modules ([`addsub`], [`digit`], [`mul`], [`sqr`],
//! [`shift`], [`cmp`]) work on plain `u64` slices; [`Bignum`] wraps them
//! with storage, sign, and aliasing-safe operation forms.

pub mod addsub;
pub mod allocator;
pub mod bignum;
pub mod buffer;
pub mod cmp;
pub mod constants;
pub mod convert;
pub mod decimal;
pub mod digit;
pub mod error;
pub mod mul;
pub mod shift;
pub mod sqr;

// Re-exports
pub use allocator::{AllocatorStats, BudgetAllocator, DigitAllocator, SystemAllocator};
pub use bignum::Bignum;
pub use buffer::DigitBuffer;
pub use error::{BignumError, Result};
