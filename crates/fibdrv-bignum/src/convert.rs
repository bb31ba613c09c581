//! Conversions to and from `num-bigint`, used as an independent reference.

use num_bigint::{BigInt, BigUint, Sign};

use crate::bignum::Bignum;
use crate::error::{BignumError, Result};

impl Bignum {
    /// Magnitude as a [`BigUint`].
    #[must_use]
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.to_le_bytes())
    }

    /// Signed value as a [`BigInt`].
    #[must_use]
    pub fn to_bigint(&self) -> BigInt {
        let sign = if self.is_zero() {
            Sign::NoSign
        } else if self.is_negative() {
            Sign::Minus
        } else {
            Sign::Plus
        };
        BigInt::from_biguint(sign, self.to_biguint())
    }

    /// Build from a [`BigUint`].
    pub fn from_biguint(value: &BigUint) -> Result<Self> {
        let mut n = Bignum::new();
        n.assign_words(&value.to_u64_digits(), false)?;
        Ok(n)
    }

    /// Build from a [`BigInt`].
    pub fn from_bigint(value: &BigInt) -> Result<Self> {
        let (sign, digits) = value.to_u64_digits();
        let mut n = Bignum::new();
        n.assign_words(&digits, sign == Sign::Minus)?;
        Ok(n)
    }

    /// Replace the value with the magnitude `words` (least-significant
    /// first, high zeros allowed) and the given sign.
    pub fn assign_words(&mut self, words: &[u64], negative: bool) -> Result<()> {
        self.set_digits_with(words.len(), |storage| {
            storage.copy_from_slice(words);
            words.len()
        })?;
        if negative {
            self.negate();
        }
        Ok(())
    }
}

impl From<&Bignum> for BigInt {
    fn from(value: &Bignum) -> Self {
        value.to_bigint()
    }
}

impl TryFrom<&BigInt> for Bignum {
    type Error = BignumError;

    fn try_from(value: &BigInt) -> Result<Self> {
        Bignum::from_bigint(value)
    }
}

impl TryFrom<&BigUint> for Bignum {
    type Error = BignumError;

    fn try_from(value: &BigUint) -> Result<Self> {
        Bignum::from_biguint(value)
    }
}
