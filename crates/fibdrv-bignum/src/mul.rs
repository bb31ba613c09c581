//! Schoolbook and Karatsuba multiplication of digit sequences.
//!
//! Karatsuba [Knuth 4.3.3] with U = U1·B + U0 and V = V1·B + V0:
//!
//! ```text
//! U·V = (B² + B)·U1·V1 + B·(U1 − U0)(V0 − V1) + (B + 1)·U0·V0
//! ```
//!
//! Both differences fit in a half, so the middle product never needs an extra
//! word, unlike `(U1 + U0)(V1 + V0)`.
//!
//! The recursion never allocates: callers pass a scratch region of at least
//! [`mul_scratch_len`] words.

use std::cmp::Ordering;

use crate::addsub::{add_assign, add_assign_n, add_n, add_scalar, sub_assign_n, sub_n};
use crate::cmp::{cmp_n, trim};
use crate::constants::KARATSUBA_MUL_THRESHOLD;
use crate::digit::{dmul, dmul_add};
use crate::sqr::sqr;

/// Scratch words needed by [`mul_n`] for operands of `n` words.
#[must_use]
pub fn mul_n_scratch_len(n: usize) -> usize {
    if n < KARATSUBA_MUL_THRESHOLD {
        return 0;
    }
    let even = n & !1;
    2 * even + mul_n_scratch_len(even / 2)
}

/// Scratch words needed by [`mul`] for operands of `ulen` and `vlen` words.
///
/// A block product needs `2·v` words of temporary plus at most `4·v` for its
/// recursion, and a trailing partial block at most `9·(v + r)`; `8·(u + v)`
/// covers every case.
#[must_use]
pub fn mul_scratch_len(ulen: usize, vlen: usize) -> usize {
    if ulen.min(vlen) < KARATSUBA_MUL_THRESHOLD {
        return 0;
    }
    ulen.saturating_add(vlen).saturating_mul(8)
}

/// Quadratic multiply: `w = u * v` with `w.len() == u.len() + v.len()`.
///
/// The first partial product is stored rather than added, so `w` needs no
/// clearing beforehand.
pub fn mul_base(u: &[u64], v: &[u64], w: &mut [u64]) {
    debug_assert_eq!(w.len(), u.len() + v.len());
    let ul = trim(u);
    let vl = trim(v);
    if ul == 0 || vl == 0 {
        w.fill(0);
        return;
    }
    w[ul + vl..].fill(0);

    let u = &u[..ul];
    let cy = dmul(u, v[0], &mut w[..ul]);
    w[ul] = cy;
    for (j, &vd) in v[..vl].iter().enumerate().skip(1) {
        let cy = dmul_add(u, vd, &mut w[j..j + ul]);
        w[j + ul] = cy;
    }
}

fn mul_half(u: &[u64], v: &[u64], w: &mut [u64], scratch: &mut [u64]) {
    if u.len() >= KARATSUBA_MUL_THRESHOLD {
        mul_n(u, v, w, scratch);
    } else {
        mul_base(u, v, w);
    }
}

/// Karatsuba multiply of two `n`-word operands into `w[..2n]`.
///
/// Identical operands (same slice) are routed to the squaring engine.
pub fn mul_n(u: &[u64], v: &[u64], w: &mut [u64], scratch: &mut [u64]) {
    let n = u.len();
    debug_assert!(v.len() == n && w.len() == 2 * n);

    if std::ptr::eq(u, v) {
        sqr(u, w, scratch);
        return;
    }
    if n < KARATSUBA_MUL_THRESHOLD {
        mul_base(u, v, w);
        return;
    }

    let odd = n & 1 == 1;
    let even = n & !1;
    let half = even / 2;
    let (u0, u1) = (&u[..half], &u[half..even]);
    let (v0, v1) = (&v[..half], &v[half..even]);

    // U0·V0 => w[0..even], U1·V1 => w[even..2·even]
    {
        let (w0, w1) = w[..2 * even].split_at_mut(even);
        mul_half(u0, v0, w0, scratch);
        mul_half(u1, v1, w1, scratch);
    }

    let (tmp, rest) = scratch.split_at_mut(even);

    // Middle window gets U0·V0 + U1·V1; the sum is formed aside because the
    // window overlaps both halves.
    let mut carry = add_n(&w[..even], &w[even..2 * even], tmp);
    carry += add_assign_n(&mut w[half..half + even], tmp);

    // |U1 - U0| and |V0 - V1| reuse tmp.
    let (ud, vd) = tmp.split_at_mut(half);
    let mut negative = cmp_n(u1, u0) == Ordering::Less;
    if negative {
        sub_n(u0, u1, ud);
    } else {
        sub_n(u1, u0, ud);
    }
    if cmp_n(v0, v1) == Ordering::Less {
        sub_n(v1, v0, vd);
        negative = !negative;
    } else {
        sub_n(v0, v1, vd);
    }

    let (prod, rest) = rest.split_at_mut(even);
    mul_half(ud, vd, prod, rest);

    let middle = &mut w[half..half + even];
    if negative {
        carry -= sub_assign_n(middle, prod);
    } else {
        carry += add_assign_n(middle, prod);
    }
    let overflow = add_scalar(&mut w[half + even..2 * even], carry);
    debug_assert_eq!(overflow, 0);

    if odd {
        // Add V[n-1]·U[..n-1] and U[n-1]·V[..n] at word n-1.
        let cy = dmul_add(&u[..even], v[even], &mut w[even..2 * even]);
        w[2 * even] = cy;
        let cy = dmul_add(v, u[even], &mut w[even..=2 * even]);
        w[2 * even + 1] = cy;
    }
}

/// `w = u * v` for operands of any lengths, `w.len() == u.len() + v.len()`.
///
/// Unequal operands are multiplied block by block: each block of the longer
/// operand, as long as the shorter one, goes through [`mul_n`] and is added
/// into its window of `w`.
pub fn mul(u: &[u64], v: &[u64], w: &mut [u64], scratch: &mut [u64]) {
    debug_assert_eq!(w.len(), u.len() + v.len());
    let ul = trim(u);
    let vl = trim(v);
    if ul == 0 || vl == 0 {
        w.fill(0);
        return;
    }
    w[ul + vl..].fill(0);

    let (u, v) = if ul < vl {
        (&v[..vl], &u[..ul])
    } else {
        (&u[..ul], &v[..vl])
    };
    let (ul, vl) = (u.len(), v.len());
    let w = &mut w[..ul + vl];

    if vl < KARATSUBA_MUL_THRESHOLD {
        mul_base(u, v, w);
        return;
    }

    mul_n(&u[..vl], v, &mut w[..2 * vl], scratch);
    if ul == vl {
        return;
    }
    w[2 * vl..].fill(0);

    let mut offset = vl;
    while ul - offset >= vl {
        let (tmp, rest) = scratch.split_at_mut(2 * vl);
        mul_n(&u[offset..offset + vl], v, tmp, rest);
        let overflow = add_assign(&mut w[offset..], tmp);
        debug_assert_eq!(overflow, 0);
        offset += vl;
    }

    let remaining = ul - offset;
    if remaining > 0 {
        let (tmp, rest) = scratch.split_at_mut(remaining + vl);
        mul(v, &u[offset..], tmp, rest);
        let overflow = add_assign(&mut w[offset..], tmp);
        debug_assert_eq!(overflow, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo_random(len: usize, seed: u64) -> Vec<u64> {
        let mut x = seed | 1;
        (0..len)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 7;
                x ^= x << 17;
                x
            })
            .collect()
    }

    fn full_mul(u: &[u64], v: &[u64]) -> Vec<u64> {
        let mut w = vec![0; u.len() + v.len()];
        let mut scratch = vec![0; mul_scratch_len(u.len(), v.len())];
        mul(u, v, &mut w, &mut scratch);
        w
    }

    fn base_mul(u: &[u64], v: &[u64]) -> Vec<u64> {
        let mut w = vec![0; u.len() + v.len()];
        mul_base(u, v, &mut w);
        w
    }

    #[test]
    fn base_small_products() {
        assert_eq!(base_mul(&[3], &[5]), vec![15, 0]);
        assert_eq!(base_mul(&[u64::MAX], &[u64::MAX]), vec![1, u64::MAX - 1]);
        assert_eq!(base_mul(&[0, 0], &[7]), vec![0, 0, 0]);
    }

    #[test]
    fn base_zero_clears_stale_words() {
        let mut w = vec![9; 4];
        mul_base(&[0, 0], &[1, 2], &mut w);
        assert_eq!(w, vec![0; 4]);
    }

    #[test]
    fn base_zero_fills_above_trimmed_product() {
        let mut w = vec![9; 6];
        mul_base(&[2, 0, 0], &[3, 0, 0], &mut w);
        assert_eq!(w, vec![6, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn karatsuba_matches_schoolbook_around_threshold() {
        for n in [
            KARATSUBA_MUL_THRESHOLD - 1,
            KARATSUBA_MUL_THRESHOLD,
            KARATSUBA_MUL_THRESHOLD + 1,
            2 * KARATSUBA_MUL_THRESHOLD + 3,
            4 * KARATSUBA_MUL_THRESHOLD,
        ] {
            let u = pseudo_random(n, 11 + n as u64);
            let v = pseudo_random(n, 97 + n as u64);
            let mut w = vec![0; 2 * n];
            let mut scratch = vec![0; mul_n_scratch_len(n)];
            mul_n(&u, &v, &mut w, &mut scratch);
            assert_eq!(w, base_mul(&u, &v), "n = {n}");
        }
    }

    #[test]
    fn karatsuba_all_ones() {
        let n = 2 * KARATSUBA_MUL_THRESHOLD + 1;
        let u = vec![u64::MAX; n];
        assert_eq!(full_mul(&u, &u.clone()), base_mul(&u, &u));
    }

    #[test]
    fn unequal_lengths_accumulate_blocks() {
        for (ul, vl) in [(100, 40), (96, 32), (200, 33), (70, 69), (33, 130)] {
            let u = pseudo_random(ul, ul as u64);
            let v = pseudo_random(vl, 1000 + vl as u64);
            assert_eq!(full_mul(&u, &v), base_mul(&u, &v), "{ul} x {vl}");
        }
    }

    #[test]
    fn mul_with_padded_operands() {
        let mut u = pseudo_random(40, 5);
        u.extend([0, 0, 0]);
        let v = pseudo_random(35, 6);
        assert_eq!(full_mul(&u, &v), base_mul(&u, &v));
    }

    #[test]
    fn mul_zero_operand() {
        let u = pseudo_random(50, 3);
        let mut w = vec![1; 52];
        mul(&u, &[0, 0], &mut w, &mut []);
        assert_eq!(w, vec![0; 52]);
    }

    #[test]
    fn scratch_bound_covers_recursion() {
        assert_eq!(mul_n_scratch_len(KARATSUBA_MUL_THRESHOLD - 1), 0);
        for n in [32, 33, 64, 65, 127, 128, 1000] {
            assert!(mul_n_scratch_len(n) <= 4 * n);
        }
        assert_eq!(mul_scratch_len(1000, 20), 0);
    }
}
