//! Fibonacci by repeated addition, used to cross-check fast doubling.

use std::sync::Arc;

use fibdrv_bignum::{Bignum, DigitAllocator};

use crate::calculator::{CoreCalculator, FibError};
use crate::constants::{FIB_TABLE, MAX_FIB_U64};
use crate::options::Options;
use crate::small::iterative_u64;

/// Iterative addition calculator: O(n) additions, no products.
pub struct IterativeAddition;

impl IterativeAddition {
    /// Create a new `IterativeAddition` calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for IterativeAddition {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for IterativeAddition {
    #[allow(clippy::cast_possible_truncation)]
    fn calculate_core(
        &self,
        n: u64,
        _opts: &Options,
        alloc: &Arc<dyn DigitAllocator>,
    ) -> Result<Bignum, FibError> {
        if let Some(value) = iterative_u64(n) {
            return Ok(Bignum::from_u64_in(value, Arc::clone(alloc))?);
        }
        tracing::debug!(n, "iterative addition");

        // (a, b) = (F(k - 1), F(k)), seeded at k = 93.
        let top = MAX_FIB_U64 as usize;
        let mut a = Bignum::from_u64_in(FIB_TABLE[top - 1], Arc::clone(alloc))?;
        let mut b = Bignum::from_u64_in(FIB_TABLE[top], Arc::clone(alloc))?;
        for _ in MAX_FIB_U64..n {
            a.add_in_place(&b)?;
            a.swap(&mut b);
        }
        Ok(b)
    }

    fn name(&self) -> &'static str {
        "IterativeAddition"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastdoubling::FastDoubling;
    use fibdrv_bignum::SystemAllocator;

    fn compute(calc: &dyn CoreCalculator, n: u64) -> Bignum {
        calc.calculate_core(n, &Options::default(), &SystemAllocator::shared())
            .unwrap()
    }

    #[test]
    fn small_values() {
        let calc = IterativeAddition::new();
        assert!(compute(&calc, 0).is_zero());
        assert_eq!(compute(&calc, 10).words(), &[55]);
        assert_eq!(compute(&calc, 94).to_dec_string().unwrap(), "19740274219868223167");
    }

    #[test]
    fn agrees_with_fast_doubling() {
        let it = IterativeAddition::new();
        let fd = FastDoubling::new();
        for n in [93, 94, 95, 100, 256, 1000, 3000] {
            assert_eq!(compute(&it, n), compute(&fd, n), "n = {n}");
        }
    }
}
