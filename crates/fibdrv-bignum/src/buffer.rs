//! Growable digit storage.
//!
//! A [`DigitBuffer`] owns a zero-filled `Vec<u64>` whose length is the
//! allocated capacity, plus the significant length of the value stored in
//! it. Capacity only grows, in multiples of [`CAPACITY_ROUNDING`] words.

use std::fmt;
use std::sync::Arc;

use crate::allocator::{DigitAllocator, SystemAllocator};
use crate::cmp::trim;
use crate::constants::{CAPACITY_ROUNDING, MAX_DIGITS};
use crate::error::{BignumError, Result};

/// Round a word count up to the capacity granularity.
pub(crate) fn round_capacity(words: usize) -> Result<usize> {
    if words > MAX_DIGITS {
        return Err(BignumError::CapacityOverflow { words });
    }
    let rounded = words
        .checked_add(CAPACITY_ROUNDING - 1)
        .map(|w| w & !(CAPACITY_ROUNDING - 1))
        .ok_or(BignumError::CapacityOverflow { words })?;
    if rounded > MAX_DIGITS {
        return Err(BignumError::CapacityOverflow { words });
    }
    Ok(rounded)
}

/// `a + b` as a word count, reporting overflow as [`BignumError::CapacityOverflow`].
pub(crate) fn checked_words(a: usize, b: usize) -> Result<usize> {
    a.checked_add(b)
        .ok_or(BignumError::CapacityOverflow { words: usize::MAX })
}

/// Digit storage with a significant length.
pub struct DigitBuffer {
    words: Vec<u64>,
    len: usize,
    alloc: Arc<dyn DigitAllocator>,
}

impl DigitBuffer {
    /// Empty buffer using the system allocator. Does not allocate.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(SystemAllocator::shared())
    }

    /// Empty buffer drawing from `alloc`. Does not allocate.
    #[must_use]
    pub fn new_in(alloc: Arc<dyn DigitAllocator>) -> Self {
        Self {
            words: Vec::new(),
            len: 0,
            alloc,
        }
    }

    /// Allocated words.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Significant words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no significant words are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The allocator this buffer grows through.
    #[must_use]
    pub fn allocator(&self) -> &Arc<dyn DigitAllocator> {
        &self.alloc
    }

    /// Significant words, least-significant first.
    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.words[..self.len]
    }

    /// The whole allocated region, including words above the significant
    /// length.
    pub(crate) fn storage_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Grow to hold at least `words` words. Never shrinks; on error the
    /// buffer is untouched.
    pub fn ensure_capacity(&mut self, words: usize) -> Result<()> {
        if words <= self.words.len() {
            return Ok(());
        }
        let rounded = round_capacity(words)?;
        if self.words.is_empty() {
            self.words = self.alloc.allocate(rounded)?;
        } else {
            self.alloc.grow(&mut self.words, rounded)?;
        }
        tracing::trace!(words, capacity = rounded, "digit buffer grown");
        Ok(())
    }

    /// Set the significant length, growing first when needed.
    pub fn set_len(&mut self, words: usize) -> Result<()> {
        self.ensure_capacity(words)?;
        self.len = words;
        Ok(())
    }

    /// Set the significant length within the current capacity.
    pub(crate) fn set_len_within(&mut self, words: usize) {
        debug_assert!(words <= self.words.len());
        self.len = words;
    }

    /// Drop high zero words from the significant length.
    pub(crate) fn normalize(&mut self) {
        self.len = trim(&self.words[..self.len]);
    }

    /// Return the storage to the allocator, leaving an empty buffer.
    pub(crate) fn release_storage(&mut self) {
        let words = std::mem::take(&mut self.words);
        self.len = 0;
        if !words.is_empty() {
            self.alloc.release(words);
        }
    }
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DigitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitBuffer")
            .field("len", &self.len)
            .field("capacity", &self.words.len())
            .finish_non_exhaustive()
    }
}

impl Drop for DigitBuffer {
    fn drop(&mut self) {
        self.release_storage();
    }
}

/// Zero-filled temporary region (product copies, Karatsuba scratch) that
/// goes back to its allocator on drop.
pub(crate) struct TempBuffer {
    words: Vec<u64>,
    alloc: Arc<dyn DigitAllocator>,
}

impl TempBuffer {
    pub(crate) fn new(alloc: &Arc<dyn DigitAllocator>, words: usize) -> Result<Self> {
        let words = if words == 0 {
            Vec::new()
        } else {
            alloc.allocate(words)?
        };
        Ok(Self {
            words,
            alloc: Arc::clone(alloc),
        })
    }

    pub(crate) fn as_slice(&self) -> &[u64] {
        &self.words
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.words
    }
}

impl Drop for TempBuffer {
    fn drop(&mut self) {
        let words = std::mem::take(&mut self.words);
        if !words.is_empty() {
            self.alloc.release(words);
        }
    }
}
