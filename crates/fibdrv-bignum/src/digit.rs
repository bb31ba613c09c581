//! Single-digit multiply and multiply-add, the base of every product.

use crate::addsub::add_assign_n;

/// Full product of two words as `(hi, lo)`.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn digit_mul(a: u64, b: u64) -> (u64, u64) {
    let prod = u128::from(a) * u128::from(b);
    ((prod >> 64) as u64, prod as u64)
}

/// [`digit_mul`] composed from four 32×32→64 multiplies, for targets
/// without a native widening multiply.
#[must_use]
pub fn digit_mul_portable(a: u64, b: u64) -> (u64, u64) {
    const MASK: u64 = 0xFFFF_FFFF;
    let (a0, a1) = (a & MASK, a >> 32);
    let (b0, b1) = (b & MASK, b >> 32);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    // Middle column: at most 3 * (2^32 - 1), fits in 64 bits.
    let mid = (p00 >> 32) + (p01 & MASK) + (p10 & MASK);
    let lo = (mid << 32) | (p00 & MASK);
    let hi = p11 + (p01 >> 32) + (p10 >> 32) + (mid >> 32);
    (hi, lo)
}

/// `w = u * s`, returning the carry word.
pub fn dmul(u: &[u64], s: u64, w: &mut [u64]) -> u64 {
    debug_assert_eq!(u.len(), w.len());
    if s <= 1 {
        if s == 0 {
            w.fill(0);
        } else {
            w.copy_from_slice(u);
        }
        return 0;
    }

    let mut cy = 0u64;
    for (&ud, wd) in u.iter().zip(w.iter_mut()) {
        let (p1, p0) = digit_mul(ud, s);
        let p0 = p0.wrapping_add(cy);
        cy = u64::from(p0 < cy) + p1;
        *wd = p0;
    }
    cy
}

/// `w *= s` in place, returning the carry word.
pub fn dmul_assign(w: &mut [u64], s: u64) -> u64 {
    if s <= 1 {
        if s == 0 {
            w.fill(0);
        }
        return 0;
    }

    let mut cy = 0u64;
    for wd in w.iter_mut() {
        let (p1, p0) = digit_mul(*wd, s);
        let p0 = p0.wrapping_add(cy);
        cy = u64::from(p0 < cy) + p1;
        *wd = p0;
    }
    cy
}

/// `w += u * s`, returning the carry word.
pub fn dmul_add(u: &[u64], s: u64, w: &mut [u64]) -> u64 {
    debug_assert_eq!(u.len(), w.len());
    if s <= 1 {
        return if s == 0 { 0 } else { add_assign_n(w, u) };
    }

    let mut cy = 0u64;
    for (&ud, wd) in u.iter().zip(w.iter_mut()) {
        let (p1, p0) = digit_mul(ud, s);
        let p0 = p0.wrapping_add(cy);
        cy = u64::from(p0 < cy) + p1;
        *wd = wd.wrapping_add(p0);
        cy += u64::from(*wd < p0);
    }
    cy
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: u64 = u64::MAX;

    #[test]
    fn digit_mul_extremes() {
        assert_eq!(digit_mul(M, M), (M - 1, 1));
        assert_eq!(digit_mul(1 << 32, 1 << 32), (1, 0));
        assert_eq!(digit_mul(0, M), (0, 0));
        assert_eq!(digit_mul(M, 2), (1, M - 1));
    }

    #[test]
    fn portable_matches_widening() {
        let samples = [
            0,
            1,
            2,
            0xFFFF_FFFF,
            0x1_0000_0000,
            0xDEAD_BEEF_CAFE_BABE,
            0x8000_0000_0000_0000,
            M - 1,
            M,
        ];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(digit_mul_portable(a, b), digit_mul(a, b), "{a:#x} * {b:#x}");
            }
        }
    }

    #[test]
    fn dmul_short_circuits() {
        let u = [3, 4, 5];
        let mut w = [9; 3];
        assert_eq!(dmul(&u, 0, &mut w), 0);
        assert_eq!(w, [0; 3]);
        assert_eq!(dmul(&u, 1, &mut w), 0);
        assert_eq!(w, u);
    }

    #[test]
    fn dmul_carries() {
        let mut w = [0; 2];
        let cy = dmul(&[M, M], M, &mut w);
        // (2^128 - 1)(2^64 - 1) = 2^192 - 2^128 - 2^64 + 1
        assert_eq!(w, [1, M]);
        assert_eq!(cy, M - 1);
    }

    #[test]
    fn dmul_assign_matches_dmul() {
        let u = [M, 3, 0x8000_0000_0000_0000];
        for s in [0, 1, 10, M] {
            let mut w = [0; 3];
            let a = dmul(&u, s, &mut w);
            let mut v = u;
            let b = dmul_assign(&mut v, s);
            assert_eq!((a, w), (b, v), "s = {s}");
        }
    }

    #[test]
    fn dmul_add_accumulates() {
        let mut w = [M, M];
        let cy = dmul_add(&[M, M], M, &mut w);
        // (2^128 - 1) + (2^128 - 1)(2^64 - 1) = (2^128 - 1) * 2^64
        assert_eq!(w, [0, M]);
        assert_eq!(cy, M);

        let mut w = [1, 2];
        assert_eq!(dmul_add(&[5, 6], 1, &mut w), 0);
        assert_eq!(w, [6, 8]);
        assert_eq!(dmul_add(&[5, 6], 0, &mut w), 0);
        assert_eq!(w, [6, 8]);
    }
}
