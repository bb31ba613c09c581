//! Decimal rendering and parsing.
//!
//! Rendering is a decimal shift-and-add: for every bit of the magnitude,
//! from the top, the decimal accumulator is doubled and the bit added in at
//! the units position. Parsing works 19 digits at a time with a single-word
//! multiply and add, so neither direction divides.

use std::str::FromStr;
use std::sync::Arc;

use crate::addsub::add_scalar;
use crate::allocator::{DigitAllocator, SystemAllocator};
use crate::bignum::Bignum;
use crate::constants::DIGIT_BITS;
use crate::digit::dmul_assign;
use crate::error::{BignumError, Result};

/// Decimal digits processed per parsing step; 10^19 fits in a word.
const CHUNK_DIGITS: usize = 19;

const POW10: [u64; CHUNK_DIGITS + 1] = {
    let mut table = [1u64; CHUNK_DIGITS + 1];
    let mut i = 1;
    while i <= CHUNK_DIGITS {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
};

/// Upper bound on the decimal digits of a `bits`-bit magnitude:
/// `floor(bits · 0.30103) + 1`, never an underestimate since log10 2 < 0.30103.
pub fn decimal_digits_bound(bits: u64) -> Result<usize> {
    let digits = bits
        .checked_mul(30103)
        .map(|scaled| scaled / 100_000 + 1)
        .ok_or(BignumError::CapacityOverflow { words: usize::MAX })?;
    usize::try_from(digits).map_err(|_| BignumError::CapacityOverflow { words: usize::MAX })
}

/// Double `acc[lead..]` and add `bit` at the units position, returning the
/// new leading index.
fn double_and_add(acc: &mut [u8], lead: usize, bit: u8) -> usize {
    let mut carry = bit;
    for d in acc[lead..].iter_mut().rev() {
        let v = *d * 2 + carry;
        carry = u8::from(v >= 10);
        *d = v - 10 * carry;
    }
    if carry == 0 {
        return lead;
    }
    let lead = lead - 1;
    acc[lead] = carry;
    lead
}

impl Bignum {
    /// Render as a decimal string, `-` prefixed when negative.
    pub fn to_dec_string(&self) -> Result<String> {
        let words = self.words();
        if words.is_empty() {
            return Ok("0".to_owned());
        }

        let ndigits = decimal_digits_bound(self.bit_len())?;
        let mut acc: Vec<u8> = Vec::new();
        acc.try_reserve_exact(ndigits)
            .map_err(|_| BignumError::AllocationFailure {
                words: ndigits.div_ceil(8),
            })?;
        acc.resize(ndigits, 0);

        // Invariant: acc[..lead] is all zero.
        let mut lead = ndigits;
        for (i, &word) in words.iter().enumerate().rev() {
            let top = if i + 1 == words.len() {
                DIGIT_BITS - word.leading_zeros()
            } else {
                DIGIT_BITS
            };
            for bit in (0..top).rev() {
                #[allow(clippy::cast_possible_truncation)]
                let b = ((word >> bit) & 1) as u8;
                lead = double_and_add(&mut acc, lead, b);
            }
        }

        let len = ndigits - lead + usize::from(self.is_negative());
        let mut s = String::new();
        s.try_reserve_exact(len)
            .map_err(|_| BignumError::AllocationFailure {
                words: len.div_ceil(8),
            })?;
        if self.is_negative() {
            s.push('-');
        }
        s.extend(acc[lead..].iter().map(|&d| char::from(b'0' + d)));
        Ok(s)
    }

    /// Parse an optionally signed decimal string, drawing storage from
    /// `alloc`.
    pub fn parse_decimal_in(s: &str, alloc: Arc<dyn DigitAllocator>) -> Result<Self> {
        let (negative, offset) = match s.as_bytes().first() {
            Some(b'-') => (true, 1),
            Some(b'+') => (false, 1),
            _ => (false, 0),
        };
        let digits = &s.as_bytes()[offset..];
        if digits.is_empty() {
            return Err(BignumError::Empty);
        }
        if let Some(pos) = digits.iter().position(|b| !b.is_ascii_digit()) {
            let position = offset + pos;
            let found = s[position..].chars().next().unwrap_or('\u{FFFD}');
            return Err(BignumError::InvalidDigit { position, found });
        }

        // log2 10 < 3.322
        let bits = digits
            .len()
            .checked_mul(3322)
            .map(|b| b / 1000 + 1)
            .ok_or(BignumError::CapacityOverflow { words: usize::MAX })?;
        let words = bits / DIGIT_BITS as usize + 2;

        let mut value = Bignum::new_in(alloc);
        value.set_digits_with(words, |storage| {
            let mut len = 0usize;
            for chunk in digits.chunks(CHUNK_DIGITS) {
                let part = chunk
                    .iter()
                    .fold(0u64, |acc, &b| acc * 10 + u64::from(b - b'0'));
                let cy = dmul_assign(&mut storage[..len], POW10[chunk.len()]);
                if cy != 0 {
                    storage[len] = cy;
                    len += 1;
                }
                let cy = add_scalar(&mut storage[..len], part);
                if cy != 0 {
                    storage[len] = cy;
                    len += 1;
                }
            }
            len
        })?;
        if negative {
            value.negate();
        }
        Ok(value)
    }

    /// Parse an optionally signed decimal string.
    pub fn parse_decimal(s: &str) -> Result<Self> {
        Self::parse_decimal_in(s, SystemAllocator::shared())
    }
}

impl FromStr for Bignum {
    type Err = BignumError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_decimal(s)
    }
}
