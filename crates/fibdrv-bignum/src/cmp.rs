//! Normalization and magnitude comparison of digit sequences.

use std::cmp::Ordering;

/// Length of `u` with high zero words removed.
#[inline]
#[must_use]
pub fn trim(u: &[u64]) -> usize {
    let mut len = u.len();
    while len > 0 && u[len - 1] == 0 {
        len -= 1;
    }
    len
}

/// Compare two sequences of equal length, most significant word first.
#[must_use]
pub fn cmp_n(u: &[u64], v: &[u64]) -> Ordering {
    debug_assert_eq!(u.len(), v.len());
    for (a, b) in u.iter().rev().zip(v.iter().rev()) {
        match a.cmp(b) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// Compare the magnitudes of two sequences of any length.
#[must_use]
pub fn cmp(u: &[u64], v: &[u64]) -> Ordering {
    let ul = trim(u);
    let vl = trim(v);
    match ul.cmp(&vl) {
        Ordering::Equal => cmp_n(&u[..ul], &v[..vl]),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_strips_high_zeros() {
        assert_eq!(trim(&[1, 2, 0, 0]), 2);
        assert_eq!(trim(&[0, 0, 0]), 0);
        assert_eq!(trim(&[]), 0);
        assert_eq!(trim(&[0, 5]), 2);
    }

    #[test]
    fn cmp_n_from_top() {
        assert_eq!(cmp_n(&[9, 1], &[0, 2]), Ordering::Less);
        assert_eq!(cmp_n(&[9, 2], &[0, 2]), Ordering::Greater);
        assert_eq!(cmp_n(&[3, 2], &[3, 2]), Ordering::Equal);
        assert_eq!(cmp_n(&[], &[]), Ordering::Equal);
    }

    #[test]
    fn cmp_ignores_padding() {
        assert_eq!(cmp(&[5, 0, 0], &[5]), Ordering::Equal);
        assert_eq!(cmp(&[0, 1], &[u64::MAX]), Ordering::Greater);
        assert_eq!(cmp(&[u64::MAX, 0], &[0, 1]), Ordering::Less);
        assert_eq!(cmp(&[0, 0], &[]), Ordering::Equal);
    }
}
