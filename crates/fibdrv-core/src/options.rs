//! Calculation options and configuration.

use crate::constants::DEFAULT_PARALLEL_THRESHOLD;

/// Options for Fibonacci calculation.
#[derive(Debug, Clone)]
pub struct Options {
    /// Operand size (in words) at which doubling steps run in parallel.
    pub parallel_threshold: usize,
    /// Memory limit in bytes for digit storage (0 = unlimited).
    pub memory_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            memory_limit: 0,
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.parallel_threshold == 0 {
            self.parallel_threshold = DEFAULT_PARALLEL_THRESHOLD;
        }
        self
    }
}
