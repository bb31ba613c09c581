//! Fibonacci numbers that fit in a machine word.

use crate::constants::MAX_FIB_U64;

/// F(n) by fast doubling on native integers, `None` above F(93).
///
/// Only the bits below the leading one are walked, found with
/// `leading_zeros`. Intermediates are kept in `u128` since the last step
/// also forms F(n + 1), which can exceed `u64`.
#[must_use]
pub fn fast_doubling_u64(n: u64) -> Option<u64> {
    if n > MAX_FIB_U64 {
        return None;
    }

    // (a, b) = (F(k), F(k + 1)), starting from k = 0.
    let (mut a, mut b) = (0u128, 1u128);
    for i in (0..u64::BITS - n.leading_zeros()).rev() {
        let f2k = a * (2 * b - a);
        let f2k1 = a * a + b * b;
        if (n >> i) & 1 == 1 {
            a = f2k1;
            b = f2k + f2k1;
        } else {
            a = f2k;
            b = f2k1;
        }
    }
    u64::try_from(a).ok()
}

/// F(n) by repeated addition, `None` above F(93).
#[must_use]
pub fn iterative_u64(n: u64) -> Option<u64> {
    if n > MAX_FIB_U64 {
        return None;
    }
    if n == 0 {
        return Some(0);
    }
    // (a, b) = (F(k - 1), F(k)), starting from k = 1.
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 1..n {
        let next = a.checked_add(b)?;
        a = b;
        b = next;
    }
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIB_TABLE;

    #[test]
    fn fast_doubling_matches_table() {
        for (n, &expected) in FIB_TABLE.iter().enumerate() {
            assert_eq!(fast_doubling_u64(n as u64), Some(expected), "n = {n}");
        }
    }

    #[test]
    fn iterative_matches_table() {
        for (n, &expected) in FIB_TABLE.iter().enumerate() {
            assert_eq!(iterative_u64(n as u64), Some(expected), "n = {n}");
        }
    }

    #[test]
    fn out_of_range() {
        assert_eq!(fast_doubling_u64(94), None);
        assert_eq!(iterative_u64(94), None);
        assert_eq!(fast_doubling_u64(u64::MAX), None);
    }
}
