//! Digit allocators.
//!
//! Every digit buffer, temporary, and Karatsuba scratch region is obtained
//! through a [`DigitAllocator`]. Buffers are `Vec<u64>` whose length is the
//! allocated word count; new words are zero-filled.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::constants::MAX_DIGITS;
use crate::error::{BignumError, Result};

/// Source of digit storage.
pub trait DigitAllocator: Send + Sync {
    /// Allocate a zero-filled buffer of exactly `words` words.
    fn allocate(&self, words: usize) -> Result<Vec<u64>>;

    /// Grow `buf` to `words` words, zero-filling the new tail. On error the
    /// buffer is left untouched. Never shrinks.
    fn grow(&self, buf: &mut Vec<u64>, words: usize) -> Result<()>;

    /// Give a buffer back.
    fn release(&self, buf: Vec<u64>);
}

fn check_words(words: usize) -> Result<()> {
    if words > MAX_DIGITS {
        return Err(BignumError::CapacityOverflow { words });
    }
    Ok(())
}

fn try_allocate(words: usize) -> Result<Vec<u64>> {
    check_words(words)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(words)
        .map_err(|_| BignumError::AllocationFailure { words })?;
    buf.resize(words, 0);
    Ok(buf)
}

fn try_grow(buf: &mut Vec<u64>, words: usize) -> Result<()> {
    check_words(words)?;
    if words <= buf.len() {
        return Ok(());
    }
    buf.try_reserve_exact(words - buf.len())
        .map_err(|_| BignumError::AllocationFailure { words })?;
    buf.resize(words, 0);
    Ok(())
}

/// Allocator backed by the global heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl SystemAllocator {
    /// Shared handle, as stored inside a `Bignum`.
    #[must_use]
    pub fn shared() -> Arc<dyn DigitAllocator> {
        Arc::new(Self)
    }
}

impl DigitAllocator for SystemAllocator {
    fn allocate(&self, words: usize) -> Result<Vec<u64>> {
        try_allocate(words)
    }

    fn grow(&self, buf: &mut Vec<u64>, words: usize) -> Result<()> {
        try_grow(buf, words)
    }

    fn release(&self, buf: Vec<u64>) {
        drop(buf);
    }
}

/// Snapshot of a [`BudgetAllocator`]'s counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Successful allocate/grow calls.
    pub allocations: u64,
    /// Requests refused because they would exceed the budget.
    pub refusals: u64,
    /// Words currently handed out.
    pub in_use_words: usize,
    /// Highest value `in_use_words` has reached.
    pub peak_words: usize,
}

/// Heap allocator that refuses requests beyond a fixed word budget.
///
/// A limit of 0 means unlimited; the counters are still maintained.
#[derive(Debug)]
pub struct BudgetAllocator {
    limit_words: usize,
    in_use: AtomicUsize,
    peak: AtomicUsize,
    allocations: AtomicU64,
    refusals: AtomicU64,
}

impl BudgetAllocator {
    /// Create an allocator limited to `limit_words` outstanding words.
    #[must_use]
    pub fn new(limit_words: usize) -> Self {
        Self {
            limit_words,
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            allocations: AtomicU64::new(0),
            refusals: AtomicU64::new(0),
        }
    }

    /// Create an allocator from a byte limit, as parsed from configuration.
    /// A partial word counts as a whole one, so any non-zero limit stays a
    /// limit.
    #[must_use]
    pub fn from_bytes(limit_bytes: usize) -> Self {
        Self::new(limit_bytes.div_ceil(std::mem::size_of::<u64>()))
    }

    /// Configured limit in words (0 = unlimited).
    #[must_use]
    pub fn limit_words(&self) -> usize {
        self.limit_words
    }

    /// Take a snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            refusals: self.refusals.load(Ordering::Relaxed),
            in_use_words: self.in_use.load(Ordering::Relaxed),
            peak_words: self.peak.load(Ordering::Relaxed),
        }
    }

    /// Reserve `extra` words against the budget.
    fn charge(&self, extra: usize, requested: usize) -> Result<()> {
        let mut current = self.in_use.load(Ordering::Relaxed);
        loop {
            let next = current
                .checked_add(extra)
                .ok_or(BignumError::CapacityOverflow { words: usize::MAX })?;
            if self.limit_words != 0 && next > self.limit_words {
                self.refusals.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    requested,
                    in_use = current,
                    limit = self.limit_words,
                    "digit allocation refused by budget"
                );
                return Err(BignumError::AllocationFailure { words: requested });
            }
            match self.in_use.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    self.peak.fetch_max(next, Ordering::Relaxed);
                    return Ok(());
                }
                Err(actual) => current = actual,
            }
        }
    }

    fn refund(&self, words: usize) {
        self.in_use.fetch_sub(words, Ordering::Relaxed);
    }
}

impl DigitAllocator for BudgetAllocator {
    fn allocate(&self, words: usize) -> Result<Vec<u64>> {
        check_words(words)?;
        self.charge(words, words)?;
        match try_allocate(words) {
            Ok(buf) => {
                self.allocations.fetch_add(1, Ordering::Relaxed);
                Ok(buf)
            }
            Err(err) => {
                self.refund(words);
                Err(err)
            }
        }
    }

    fn grow(&self, buf: &mut Vec<u64>, words: usize) -> Result<()> {
        check_words(words)?;
        if words <= buf.len() {
            return Ok(());
        }
        let extra = words - buf.len();
        self.charge(extra, words)?;
        match try_grow(buf, words) {
            Ok(()) => {
                self.allocations.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                self.refund(extra);
                Err(err)
            }
        }
    }

    fn release(&self, buf: Vec<u64>) {
        self.refund(buf.len());
    }
}
