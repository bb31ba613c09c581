//! Error type for bignum operations.

/// Errors raised by the bignum engine.
///
/// Every fallible step of an operation runs before the destination is
/// written, so a caller that sees an error still holds the previous value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BignumError {
    /// The allocator could not provide the requested number of words.
    #[error("allocation of {words} digit words failed")]
    AllocationFailure {
        /// Words that were requested.
        words: usize,
    },

    /// The requested word count does not fit the length counter.
    #[error("digit count {words} exceeds the supported maximum")]
    CapacityOverflow {
        /// Words that were requested (saturated when the count itself overflowed).
        words: usize,
    },

    /// A decimal string contained something other than an ASCII digit.
    #[error("invalid character {found:?} at position {position}")]
    InvalidDigit {
        /// Byte offset of the offending character.
        position: usize,
        /// The character found there.
        found: char,
    },

    /// A decimal string had no digits.
    #[error("cannot parse a number from an empty string")]
    Empty,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BignumError>;
