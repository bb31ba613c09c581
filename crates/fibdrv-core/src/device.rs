//! User-space model of the Fibonacci character device.
//!
//! A [`FibDevice`] admits one [`FibSession`] at a time. The session keeps a
//! file position: `read` computes F(position) and reports its size in words,
//! `write` reports how long the last computation took, and `seek` moves the
//! position within `[0, MAX_LENGTH]`.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, MutexGuard};

use fibdrv_bignum::{AllocatorStats, Bignum, BudgetAllocator, DigitAllocator};

use crate::calculator::{Calculator, FibCalculator, FibError};
use crate::constants::MAX_LENGTH;
use crate::fastdoubling::FastDoubling;
use crate::options::Options;

/// Reference point of a [`FibSession::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// From offset 0.
    Set,
    /// From the current position.
    Current,
    /// Backwards from `MAX_LENGTH`.
    End,
}

/// The device: a calculator, its options, and the single-session lock.
pub struct FibDevice {
    calculator: Arc<dyn Calculator>,
    opts: Options,
    budget: Arc<BudgetAllocator>,
    alloc: Arc<dyn DigitAllocator>,
    lock: Mutex<()>,
}

impl FibDevice {
    /// Device computing with `calculator`. Digit storage is limited to
    /// `opts.memory_limit` bytes when that is non-zero.
    #[must_use]
    pub fn new(calculator: Arc<dyn Calculator>, opts: Options) -> Self {
        let opts = opts.normalize();
        let budget = Arc::new(BudgetAllocator::from_bytes(opts.memory_limit));
        let alloc: Arc<dyn DigitAllocator> = budget.clone();
        Self {
            calculator,
            opts,
            budget,
            alloc,
            lock: Mutex::new(()),
        }
    }

    /// Open a session, or fail with [`FibError::Busy`] while another is live.
    pub fn open(&self) -> Result<FibSession<'_>, FibError> {
        let Some(guard) = self.lock.try_lock() else {
            tracing::warn!("fibdrv is in use");
            return Err(FibError::Busy);
        };
        tracing::info!(calculator = self.calculator.name(), "session opened");
        Ok(FibSession {
            device: self,
            _guard: guard,
            pos: 0,
            last_ns: 0,
        })
    }

    /// Name of the calculator in use.
    #[must_use]
    pub fn calculator_name(&self) -> &str {
        self.calculator.name()
    }

    /// Digit allocation counters for everything computed so far.
    #[must_use]
    pub fn allocator_stats(&self) -> AllocatorStats {
        self.budget.stats()
    }
}

impl Default for FibDevice {
    fn default() -> Self {
        Self::new(
            Arc::new(FibCalculator::new(Arc::new(FastDoubling::new()))),
            Options::default(),
        )
    }
}

/// An open handle on a [`FibDevice`]. Dropping it releases the device.
pub struct FibSession<'a> {
    device: &'a FibDevice,
    _guard: MutexGuard<'a, ()>,
    pos: u64,
    last_ns: u64,
}

impl FibSession<'_> {
    /// Current position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Move the position and return it. The result is clamped to
    /// `[0, MAX_LENGTH]`.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> u64 {
        let base = match whence {
            Whence::Set => 0,
            Whence::Current => i128::from(self.pos),
            Whence::End => i128::from(MAX_LENGTH),
        };
        let target = match whence {
            Whence::End => base - i128::from(offset),
            Whence::Set | Whence::Current => base + i128::from(offset),
        };
        let clamped = target.clamp(0, i128::from(MAX_LENGTH));
        // Clamped into [0, MAX_LENGTH], so the conversion cannot fail.
        self.pos = u64::try_from(clamped).unwrap_or(MAX_LENGTH);
        tracing::debug!(offset, ?whence, pos = self.pos, "seek");
        self.pos
    }

    /// Compute F(position), copy as many words as fit into `buf`, and return
    /// the word length of the full value.
    pub fn read(&mut self, buf: &mut [u64]) -> Result<usize, FibError> {
        let value = self.read_value()?;
        let words = value.words();
        let n = words.len().min(buf.len());
        buf[..n].copy_from_slice(&words[..n]);
        Ok(words.len())
    }

    /// Compute F(position) and return it.
    pub fn read_value(&mut self) -> Result<Bignum, FibError> {
        let device = self.device;
        let start = Instant::now();
        let value = device
            .calculator
            .calculate(self.pos, &device.opts, &device.alloc)?;
        self.last_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        tracing::debug!(k = self.pos, words = value.len(), ns = self.last_ns, "read");
        Ok(value)
    }

    /// Nanoseconds spent in the last computation.
    #[must_use]
    pub fn write(&self) -> u64 {
        self.last_ns
    }
}

impl Drop for FibSession<'_> {
    fn drop(&mut self) {
        tracing::info!(pos = self.pos, "session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_open_is_busy() {
        let device = FibDevice::default();
        let session = device.open().unwrap();
        assert!(matches!(device.open(), Err(FibError::Busy)));
        drop(session);
        assert!(device.open().is_ok());
    }

    #[test]
    fn seek_clamps() {
        let device = FibDevice::default();
        let mut s = device.open().unwrap();
        assert_eq!(s.seek(10, Whence::Set), 10);
        assert_eq!(s.seek(5, Whence::Current), 15);
        assert_eq!(s.seek(-100, Whence::Current), 0);
        assert_eq!(s.seek(-1, Whence::Set), 0);
        assert_eq!(s.seek(i64::MAX, Whence::Set), MAX_LENGTH);
        assert_eq!(s.seek(1, Whence::End), MAX_LENGTH - 1);
        assert_eq!(s.seek(-5, Whence::End), MAX_LENGTH);
        assert_eq!(s.seek(i64::MIN, Whence::Current), 0);
    }

    #[test]
    fn read_reports_length_and_fills_buffer() {
        let device = FibDevice::default();
        let mut s = device.open().unwrap();
        s.seek(100, Whence::Set);
        let mut buf = [0u64; 4];
        let len = s.read(&mut buf).unwrap();
        assert_eq!(len, 2);
        // F(100) = 354224848179261915075 = 19 * 2^64 + 3736710778780434371
        assert_eq!(buf, [3_736_710_778_780_434_371, 19, 0, 0]);

        let mut short = [0u64; 1];
        assert_eq!(s.read(&mut short).unwrap(), 2);
        assert_eq!(short, [3_736_710_778_780_434_371]);
    }

    #[test]
    fn read_zero_and_value() {
        let device = FibDevice::default();
        let mut s = device.open().unwrap();
        assert_eq!(s.read(&mut []).unwrap(), 0);
        s.seek(93, Whence::Set);
        assert_eq!(s.read_value().unwrap().words(), &[12_200_160_415_121_876_738]);
    }

    #[test]
    fn memory_limit_surfaces_as_error() {
        let device = FibDevice::new(
            Arc::new(FibCalculator::new(Arc::new(FastDoubling::new()))),
            Options {
                memory_limit: 256,
                ..Options::default()
            },
        );
        let mut s = device.open().unwrap();
        s.seek(100_000, Whence::Set);
        assert!(matches!(s.read_value(), Err(FibError::Bignum(_))));
        assert!(device.allocator_stats().refusals > 0);
    }

    #[test]
    fn sub_word_memory_limit_is_enforced() {
        let device = FibDevice::new(
            Arc::new(FibCalculator::new(Arc::new(FastDoubling::new()))),
            Options {
                memory_limit: 4,
                ..Options::default()
            },
        );
        let mut s = device.open().unwrap();
        s.seek(5, Whence::Set);
        assert!(matches!(s.read_value(), Err(FibError::Bignum(_))));
        assert_eq!(device.allocator_stats().refusals, 1);
    }
}
