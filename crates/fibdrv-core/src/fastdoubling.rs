//! Fast Doubling on `Bignum`.
//!
//! With (a0, a1) = (F(k-1), F(k)) the doubling identities are
//!   F(2k-1) = F(k-1)^2 + F(k)^2
//!   F(2k)   = F(k) * (2*F(k-1) + F(k))
//!
//! Bits of n are walked from the second-highest down; a set bit advances
//! (F(2k-1), F(2k)) to (F(2k), F(2k+1)) with a swap and one addition.

use std::sync::Arc;

use fibdrv_bignum::{Bignum, DigitAllocator};

use crate::calculator::{CoreCalculator, FibError};
use crate::options::Options;

/// Working registers of one computation.
struct DoublingState {
    a0: Bignum,
    a1: Bignum,
    a: Bignum,
    tmp: Bignum,
    /// Destinations for the parallel step.
    sq0: Bignum,
    prod: Bignum,
}

impl DoublingState {
    fn new(alloc: &Arc<dyn DigitAllocator>) -> Result<Self, FibError> {
        let zero = || Bignum::new_in(Arc::clone(alloc));
        Ok(Self {
            a0: zero(),
            a1: Bignum::from_u64_in(1, Arc::clone(alloc))?,
            a: zero(),
            tmp: zero(),
            sq0: zero(),
            prod: zero(),
        })
    }

    /// (a0, a1) = (F(2k-1), F(2k)), one product after another.
    fn double(&mut self) -> Result<(), FibError> {
        self.a0.shl_to(1, &mut self.a)?;
        self.a.add_in_place(&self.a1)?;
        self.a1.square_to(&mut self.tmp)?;
        self.a0.square_in_place()?;
        self.a0.add_in_place(&self.tmp)?;
        self.a1.mul_in_place(&self.a)?;
        Ok(())
    }

    /// Same as [`DoublingState::double`], with the two squares and the
    /// product evaluated concurrently into separate destinations.
    fn double_parallel(&mut self) -> Result<(), FibError> {
        self.a0.shl_to(1, &mut self.a)?;
        self.a.add_in_place(&self.a1)?;

        let Self {
            a0,
            a1,
            a,
            tmp,
            sq0,
            prod,
        } = self;
        let (r0, (r1, r2)) = rayon::join(
            || a0.square_to(sq0),
            || rayon::join(|| a1.square_to(tmp), || a1.mul_to(a, prod)),
        );
        r0?;
        r1?;
        r2?;

        self.a0.swap(&mut self.sq0);
        self.a0.add_in_place(&self.tmp)?;
        self.a1.swap(&mut self.prod);
        Ok(())
    }

    /// (a0, a1) = (F(2k), F(2k+1)).
    fn advance(&mut self) -> Result<(), FibError> {
        self.a0.swap(&mut self.a1);
        self.a1.add_in_place(&self.a0)?;
        Ok(())
    }
}

/// Fast Doubling calculator.
///
/// # Example
/// ```
/// use fibdrv_bignum::SystemAllocator;
/// use fibdrv_core::calculator::CoreCalculator;
/// use fibdrv_core::fastdoubling::FastDoubling;
/// use fibdrv_core::options::Options;
///
/// let calc = FastDoubling::new();
/// let alloc = SystemAllocator::shared();
/// let result = calc.calculate_core(100, &Options::default(), &alloc).unwrap();
/// assert_eq!(result.to_dec_string().unwrap(), "354224848179261915075");
/// ```
pub struct FastDoubling;

impl FastDoubling {
    /// Create a new `FastDoubling` calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FastDoubling {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for FastDoubling {
    fn calculate_core(
        &self,
        n: u64,
        opts: &Options,
        alloc: &Arc<dyn DigitAllocator>,
    ) -> Result<Bignum, FibError> {
        if n == 0 {
            return Ok(Bignum::new_in(Arc::clone(alloc)));
        }
        if n <= 2 {
            return Ok(Bignum::from_u64_in(1, Arc::clone(alloc))?);
        }

        let num_bits = u64::BITS - n.leading_zeros();
        tracing::debug!(n, num_bits, "fast doubling");

        let mut state = DoublingState::new(alloc)?;
        for i in (0..num_bits - 1).rev() {
            if state.a1.len() >= opts.parallel_threshold {
                state.double_parallel()?;
            } else {
                state.double()?;
            }
            if (n >> i) & 1 == 1 {
                state.advance()?;
            }
        }
        Ok(state.a1)
    }

    fn name(&self) -> &'static str {
        "FastDoubling"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibdrv_bignum::SystemAllocator;

    fn fib(n: u64, parallel_threshold: usize) -> String {
        let opts = Options {
            parallel_threshold,
            ..Options::default()
        };
        FastDoubling::new()
            .calculate_core(n, &opts, &SystemAllocator::shared())
            .unwrap()
            .to_dec_string()
            .unwrap()
    }

    #[test]
    fn small_values() {
        assert_eq!(fib(0, 512), "0");
        assert_eq!(fib(1, 512), "1");
        assert_eq!(fib(2, 512), "1");
        assert_eq!(fib(3, 512), "2");
        assert_eq!(fib(10, 512), "55");
        assert_eq!(fib(93, 512), "12200160415121876738");
    }

    #[test]
    fn f1000() {
        let f = fib(1000, 512);
        assert_eq!(f.len(), 209);
        assert!(f.starts_with("43466557686937456435688527675040625802564"));
        assert!(f.ends_with("849228875"));
    }

    #[test]
    fn parallel_step_agrees() {
        for n in [94, 500, 4321, 20_000] {
            assert_eq!(fib(n, 1), fib(n, usize::MAX), "n = {n}");
        }
    }
}
