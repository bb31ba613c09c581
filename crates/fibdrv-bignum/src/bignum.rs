//! The signed-magnitude big integer.
//!
//! Out-of-place operations take the form `a.op_to(&b, &mut out)`; the borrow
//! checker keeps `out` distinct from both sources, and a call whose two
//! sources are the same instance is routed to the shift or squaring path.
//! In-place operations (`op_in_place`) use `self` as both destination and
//! first source.
//!
//! Every fallible step (capacity growth, temporaries, scratch) runs before
//! the destination's value is touched, so an `Err` leaves it as it was.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::addsub::{add, add_assign, rsub_assign_n, sub, sub_assign};
use crate::allocator::DigitAllocator;
use crate::buffer::{checked_words, DigitBuffer, TempBuffer};
use crate::cmp::cmp;
use crate::constants::DIGIT_BITS;
use crate::error::{BignumError, Result};
use crate::mul::{mul, mul_scratch_len};
use crate::shift::{lshift, lshift_in_place};
use crate::sqr::{sqr, sqr_scratch_len};

/// Arbitrary-precision signed integer in base 2^64.
///
/// Zero is always stored with a positive sign and no significant words.
#[derive(Default)]
pub struct Bignum {
    buf: DigitBuffer,
    negative: bool,
}

/// Split a bit shift into whole words and the remaining bits.
#[allow(clippy::cast_possible_truncation)]
fn split_shift(bits: u64) -> Result<(usize, u32)> {
    let words = usize::try_from(bits / u64::from(DIGIT_BITS))
        .map_err(|_| BignumError::CapacityOverflow { words: usize::MAX })?;
    Ok((words, (bits % u64::from(DIGIT_BITS)) as u32))
}

impl Bignum {
    /// Zero, using the system allocator. Does not allocate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero, drawing storage from `alloc`. Does not allocate.
    #[must_use]
    pub fn new_in(alloc: Arc<dyn DigitAllocator>) -> Self {
        Self {
            buf: DigitBuffer::new_in(alloc),
            negative: false,
        }
    }

    /// A value holding `value`, using the system allocator.
    pub fn from_u64(value: u64) -> Result<Self> {
        let mut n = Self::new();
        n.set_u64(value)?;
        Ok(n)
    }

    /// A value holding `value`, drawing storage from `alloc`.
    pub fn from_u64_in(value: u64, alloc: Arc<dyn DigitAllocator>) -> Result<Self> {
        let mut n = Self::new_in(alloc);
        n.set_u64(value)?;
        Ok(n)
    }

    /// A new zero that shares this value's allocator.
    #[must_use]
    pub fn sibling(&self) -> Self {
        Self::new_in(Arc::clone(self.buf.allocator()))
    }

    /// The allocator this value grows through.
    #[must_use]
    pub fn allocator(&self) -> &Arc<dyn DigitAllocator> {
        self.buf.allocator()
    }

    /// Replace the value with `value`.
    pub fn set_u64(&mut self, value: u64) -> Result<()> {
        if value == 0 {
            self.set_zero();
            return Ok(());
        }
        self.buf.ensure_capacity(1)?;
        self.buf.storage_mut()[0] = value;
        self.buf.set_len_within(1);
        self.negative = false;
        Ok(())
    }

    /// Replace the value with zero, keeping the storage.
    pub fn set_zero(&mut self) {
        self.buf.set_len_within(0);
        self.negative = false;
    }

    /// True for zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.buf.is_empty()
    }

    /// True for values below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Significant words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True for zero; same as [`Bignum::is_zero`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Allocated words.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Magnitude words, least-significant first, without high zeros.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        self.buf.as_slice()
    }

    /// Magnitude as little-endian bytes, without high zero bytes.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.words().iter().flat_map(|w| w.to_le_bytes()).collect();
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
        bytes
    }

    /// Number of significant bits of the magnitude.
    #[must_use]
    pub fn bit_len(&self) -> u64 {
        match self.words().last() {
            None => 0,
            Some(&top) => {
                (self.len() as u64 - 1) * u64::from(DIGIT_BITS)
                    + u64::from(DIGIT_BITS - top.leading_zeros())
            }
        }
    }

    /// Flip the sign. Zero stays positive.
    pub fn negate(&mut self) {
        if !self.is_zero() {
            self.negative = !self.negative;
        }
    }

    /// Exchange the two values, storage and allocator included.
    pub fn swap(&mut self, other: &mut Bignum) {
        std::mem::swap(self, other);
    }

    /// Give the storage back to the allocator.
    pub fn release(mut self) {
        self.buf.release_storage();
    }

    /// Copy `src` into `self`.
    pub fn set_from(&mut self, src: &Bignum) -> Result<()> {
        self.set_magnitude(src.words(), src.negative)
    }

    /// Copy with its own storage from the same allocator.
    pub fn try_clone(&self) -> Result<Self> {
        let mut n = self.sibling();
        n.set_from(self)?;
        Ok(n)
    }

    fn set_magnitude(&mut self, words: &[u64], negative: bool) -> Result<()> {
        let n = words.len();
        self.buf.ensure_capacity(n)?;
        self.buf.storage_mut()[..n].copy_from_slice(words);
        self.buf.set_len_within(n);
        self.buf.normalize();
        self.negative = negative && !self.is_zero();
        Ok(())
    }

    /// Fill the magnitude through `f`, which gets `words` zeroed words and
    /// returns how many it used. The sign becomes positive.
    pub(crate) fn set_digits_with(
        &mut self,
        words: usize,
        f: impl FnOnce(&mut [u64]) -> usize,
    ) -> Result<()> {
        self.buf.ensure_capacity(words)?;
        let storage = &mut self.buf.storage_mut()[..words];
        storage.fill(0);
        let len = f(storage);
        self.buf.set_len_within(len);
        self.buf.normalize();
        self.negative = false;
        Ok(())
    }

    /// `out = self + rhs`.
    pub fn add_to(&self, rhs: &Bignum, out: &mut Bignum) -> Result<()> {
        if std::ptr::eq(self, rhs) {
            return self.shl_to(1, out);
        }
        self.add_signed_to(rhs.words(), rhs.negative, out)
    }

    /// `out = self - rhs`.
    pub fn sub_to(&self, rhs: &Bignum, out: &mut Bignum) -> Result<()> {
        if std::ptr::eq(self, rhs) {
            out.set_zero();
            return Ok(());
        }
        self.add_signed_to(rhs.words(), !rhs.negative, out)
    }

    /// `self += rhs`.
    pub fn add_in_place(&mut self, rhs: &Bignum) -> Result<()> {
        self.add_signed_in_place(rhs.words(), rhs.negative)
    }

    /// `self -= rhs`.
    pub fn sub_in_place(&mut self, rhs: &Bignum) -> Result<()> {
        self.add_signed_in_place(rhs.words(), !rhs.negative)
    }

    /// `self += self`.
    pub fn double_in_place(&mut self) -> Result<()> {
        self.shl_in_place(1)
    }

    fn add_signed_to(&self, rhs: &[u64], rhs_negative: bool, out: &mut Bignum) -> Result<()> {
        let lhs = self.words();
        if rhs.is_empty() {
            return out.set_magnitude(lhs, self.negative);
        }
        if lhs.is_empty() {
            return out.set_magnitude(rhs, rhs_negative);
        }

        if self.negative == rhs_negative {
            let n = lhs.len().max(rhs.len());
            out.buf.ensure_capacity(checked_words(n, 1)?)?;
            let storage = out.buf.storage_mut();
            let cy = add(lhs, rhs, &mut storage[..n]);
            storage[n] = cy;
            out.buf.set_len_within(n + 1);
            out.buf.normalize();
            out.negative = self.negative;
            return Ok(());
        }

        let (big, small, negative) = match cmp(lhs, rhs) {
            Ordering::Equal => {
                out.set_zero();
                return Ok(());
            }
            Ordering::Greater => (lhs, rhs, self.negative),
            Ordering::Less => (rhs, lhs, rhs_negative),
        };
        let n = big.len();
        out.buf.ensure_capacity(n)?;
        let borrow = sub(big, small, &mut out.buf.storage_mut()[..n]);
        debug_assert_eq!(borrow, 0);
        out.buf.set_len_within(n);
        out.buf.normalize();
        out.negative = negative;
        Ok(())
    }

    fn add_signed_in_place(&mut self, rhs: &[u64], rhs_negative: bool) -> Result<()> {
        if rhs.is_empty() {
            return Ok(());
        }
        if self.is_zero() {
            return self.set_magnitude(rhs, rhs_negative);
        }

        let len = self.len();
        if self.negative == rhs_negative {
            let n = len.max(rhs.len());
            self.buf.ensure_capacity(checked_words(n, 1)?)?;
            let storage = self.buf.storage_mut();
            storage[len..=n].fill(0);
            let cy = add_assign(&mut storage[..n], rhs);
            storage[n] = cy;
            self.buf.set_len_within(n + 1);
            self.buf.normalize();
            return Ok(());
        }

        match cmp(self.words(), rhs) {
            Ordering::Equal => self.set_zero(),
            Ordering::Greater => {
                let borrow = sub_assign(&mut self.buf.storage_mut()[..len], rhs);
                debug_assert_eq!(borrow, 0);
                self.buf.normalize();
            }
            Ordering::Less => {
                let n = rhs.len();
                self.buf.ensure_capacity(n)?;
                let storage = self.buf.storage_mut();
                storage[len..n].fill(0);
                let borrow = rsub_assign_n(&mut storage[..n], rhs);
                debug_assert_eq!(borrow, 0);
                self.buf.set_len_within(n);
                self.buf.normalize();
                self.negative = rhs_negative;
            }
        }
        Ok(())
    }

    /// `out = self * rhs`. `a.mul_to(&a, out)` squares.
    pub fn mul_to(&self, rhs: &Bignum, out: &mut Bignum) -> Result<()> {
        if std::ptr::eq(self, rhs) {
            return self.square_to(out);
        }
        if self.is_zero() || rhs.is_zero() {
            out.set_zero();
            return Ok(());
        }

        let (u, v) = (self.words(), rhs.words());
        let size = checked_words(u.len(), v.len())?;
        let scratch_len = mul_scratch_len(u.len(), v.len());
        tracing::debug!(lhs = u.len(), rhs = v.len(), scratch_len, "multiply");

        out.buf.ensure_capacity(size)?;
        let mut scratch = TempBuffer::new(out.allocator(), scratch_len)?;
        mul(u, v, &mut out.buf.storage_mut()[..size], scratch.as_mut_slice());
        out.buf.set_len_within(size);
        out.buf.normalize();
        out.negative = self.negative != rhs.negative;
        Ok(())
    }

    /// `self *= rhs`.
    pub fn mul_in_place(&mut self, rhs: &Bignum) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }
        if rhs.is_zero() {
            self.set_zero();
            return Ok(());
        }

        let (ul, vl) = (self.len(), rhs.len());
        let size = checked_words(ul, vl)?;
        let scratch_len = mul_scratch_len(ul, vl);
        tracing::debug!(lhs = ul, rhs = vl, scratch_len, "multiply in place");

        let mut product = TempBuffer::new(self.allocator(), size)?;
        let mut scratch = TempBuffer::new(self.allocator(), scratch_len)?;
        self.buf.ensure_capacity(size)?;
        mul(
            self.words(),
            rhs.words(),
            product.as_mut_slice(),
            scratch.as_mut_slice(),
        );
        self.buf.storage_mut()[..size].copy_from_slice(product.as_slice());
        self.buf.set_len_within(size);
        self.buf.normalize();
        self.negative = self.negative != rhs.negative;
        Ok(())
    }

    /// `out = self²`.
    pub fn square_to(&self, out: &mut Bignum) -> Result<()> {
        if self.is_zero() {
            out.set_zero();
            return Ok(());
        }

        let n = self.len();
        let size = checked_words(n, n)?;
        let scratch_len = sqr_scratch_len(n);
        tracing::debug!(len = n, scratch_len, "square");

        out.buf.ensure_capacity(size)?;
        let mut scratch = TempBuffer::new(out.allocator(), scratch_len)?;
        sqr(
            self.words(),
            &mut out.buf.storage_mut()[..size],
            scratch.as_mut_slice(),
        );
        out.buf.set_len_within(size);
        out.buf.normalize();
        out.negative = false;
        Ok(())
    }

    /// `self = self²`.
    pub fn square_in_place(&mut self) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }

        let n = self.len();
        let size = checked_words(n, n)?;
        let scratch_len = sqr_scratch_len(n);
        tracing::debug!(len = n, scratch_len, "square in place");

        let mut product = TempBuffer::new(self.allocator(), size)?;
        let mut scratch = TempBuffer::new(self.allocator(), scratch_len)?;
        self.buf.ensure_capacity(size)?;
        sqr(self.words(), product.as_mut_slice(), scratch.as_mut_slice());
        self.buf.storage_mut()[..size].copy_from_slice(product.as_slice());
        self.buf.set_len_within(size);
        self.buf.normalize();
        self.negative = false;
        Ok(())
    }

    /// `out = self << bits`. The sign is kept.
    pub fn shl_to(&self, bits: u64, out: &mut Bignum) -> Result<()> {
        if self.is_zero() || bits == 0 {
            return out.set_from(self);
        }

        let (shift, rem) = split_shift(bits)?;
        let n = self.len();
        let size = checked_words(checked_words(n, shift)?, 1)?;
        out.buf.ensure_capacity(size)?;

        let storage = out.buf.storage_mut();
        storage[..shift].fill(0);
        let cy = lshift(self.words(), rem, &mut storage[shift..shift + n]);
        storage[shift + n] = cy;
        out.buf.set_len_within(size);
        out.buf.normalize();
        out.negative = self.negative;
        Ok(())
    }

    /// `self <<= bits`.
    pub fn shl_in_place(&mut self, bits: u64) -> Result<()> {
        if self.is_zero() || bits == 0 {
            return Ok(());
        }

        let (shift, rem) = split_shift(bits)?;
        let n = self.len();
        let size = checked_words(checked_words(n, shift)?, 1)?;
        self.buf.ensure_capacity(size)?;

        let storage = self.buf.storage_mut();
        let cy = lshift_in_place(&mut storage[..n], rem);
        if shift > 0 {
            storage.copy_within(..n, shift);
            storage[..shift].fill(0);
        }
        storage[shift + n] = cy;
        self.buf.set_len_within(size);
        self.buf.normalize();
        Ok(())
    }

    fn cmp_signed(&self, other: &Bignum) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => cmp(self.words(), other.words()),
            (true, true) => cmp(other.words(), self.words()),
        }
    }
}

impl PartialEq for Bignum {
    fn eq(&self, other: &Self) -> bool {
        self.negative == other.negative && self.words() == other.words()
    }
}

impl Eq for Bignum {}

impl PartialOrd for Bignum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bignum {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_signed(other)
    }
}

impl fmt::Debug for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bignum")
            .field("negative", &self.negative)
            .field("words", &self.words())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_dec_string().map_err(|_| fmt::Error)?;
        f.pad_integral(!self.negative, "", s.trim_start_matches('-'))
    }
}
