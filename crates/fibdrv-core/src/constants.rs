//! Constants for Fibonacci calculation and the device model.

/// Default operand size (in words) at which a doubling step runs its
/// three products in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 512;

/// Maximum Fibonacci index that fits in a u64.
/// F(93) = 12200160415121876738
pub const MAX_FIB_U64: u64 = 93;

/// Largest offset the device accepts; seeks are clamped to `[0, MAX_LENGTH]`.
pub const MAX_LENGTH: u64 = 1_000_000;

/// Precomputed Fibonacci values for n = 0..=93.
///
/// F(94) = 19,740,274,219,868,223,167 overflows `u64::MAX`.
pub const FIB_TABLE: [u64; 94] = {
    let mut table = [0u64; 94];
    table[1] = 1;
    let mut i = 2;
    while i < 94 {
        table[i] = table[i - 1] + table[i - 2];
        i += 1;
    }
    table
};

/// Process exit codes used by the command-line client.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A computed value disagreed with the reference.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// The device already had an open session.
    pub const ERROR_BUSY: i32 = 16;
}
