//! Squaring of digit sequences.
//!
//! Karatsuba squaring applies
//!
//! ```text
//! U² = (B² + B)·U1² − B·(U1 − U0)² + (B + 1)·U0²
//! ```
//!
//! which needs a single correction square and no sign bookkeeping beyond
//! skipping it when the halves are equal.

use std::cmp::Ordering;

use crate::addsub::{add_assign_n, add_n, add_scalar, sub_assign_n, sub_n};
use crate::cmp::{cmp_n, trim};
use crate::constants::{BASE_SQR_THRESHOLD, KARATSUBA_SQR_THRESHOLD};
use crate::digit::{digit_mul, dmul, dmul_add};
use crate::mul::mul_base;
use crate::shift::lshift_in_place;

/// Scratch words needed by [`sqr`] for an `n`-word operand.
#[must_use]
pub fn sqr_scratch_len(n: usize) -> usize {
    if n < KARATSUBA_SQR_THRESHOLD {
        return 0;
    }
    let even = n & !1;
    2 * even + sqr_scratch_len(even / 2)
}

/// Add the diagonal terms `u[i]²·B^(2i)` into `v`.
///
/// Each step carries once out of the low word into the high word and once
/// out of the high word into the next pair.
fn sqr_diag(u: &[u64], v: &mut [u64]) {
    debug_assert_eq!(v.len(), 2 * u.len());
    let mut carry = 0u64;
    for (&x, pair) in u.iter().zip(v.chunks_exact_mut(2)) {
        let (hi, lo) = digit_mul(x, x);
        let (lo, c0) = lo.overflowing_add(carry);
        let (s0, c1) = pair[0].overflowing_add(lo);
        pair[0] = s0;
        // x² + carry + pair[0] < 2^128, so the high word cannot wrap here.
        let hi = hi + u64::from(c0) + u64::from(c1);
        let (s1, c2) = pair[1].overflowing_add(hi);
        pair[1] = s1;
        carry = u64::from(c2);
    }
    debug_assert_eq!(carry, 0);
}

/// Quadratic squaring: `v = u²` with `v.len() == 2 * u.len()`.
pub fn sqr_base(u: &[u64], v: &mut [u64]) {
    debug_assert_eq!(v.len(), 2 * u.len());
    let n = trim(u);
    v[2 * n..].fill(0);
    if n == 0 {
        return;
    }
    let u = &u[..n];
    let v = &mut v[..2 * n];

    if n == 1 {
        let (hi, lo) = digit_mul(u[0], u[0]);
        v[0] = lo;
        v[1] = hi;
        return;
    }
    if n <= BASE_SQR_THRESHOLD {
        mul_base(u, u, v);
        return;
    }

    // Cross products u[i]·u[j], i < j, each computed once.
    v[0] = 0;
    let cy = dmul(&u[1..], u[0], &mut v[1..n]);
    v[n] = cy;
    for i in 1..n - 1 {
        let start = 2 * i + 1;
        let end = n + i;
        let cy = dmul_add(&u[i + 1..], u[i], &mut v[start..end]);
        v[end] = cy;
    }

    // Double them.
    let top = 2 * n - 1;
    let cy = lshift_in_place(&mut v[1..top], 1);
    v[top] = cy;

    sqr_diag(u, v);
}

fn sqr_half(u: &[u64], v: &mut [u64], scratch: &mut [u64]) {
    if u.len() >= KARATSUBA_SQR_THRESHOLD {
        sqr(u, v, scratch);
    } else {
        sqr_base(u, v);
    }
}

/// `v = u²` with `v.len() == 2 * u.len()`, using Karatsuba squaring at or
/// above [`KARATSUBA_SQR_THRESHOLD`] words.
///
/// `scratch` must hold at least [`sqr_scratch_len`] words.
pub fn sqr(u: &[u64], v: &mut [u64], scratch: &mut [u64]) {
    debug_assert_eq!(v.len(), 2 * u.len());
    let n = trim(u);
    v[2 * n..].fill(0);
    let u = &u[..n];
    let v = &mut v[..2 * n];

    if n < KARATSUBA_SQR_THRESHOLD {
        if n == 0 {
            return;
        }
        if n <= BASE_SQR_THRESHOLD {
            mul_base(u, u, v);
        } else {
            sqr_base(u, v);
        }
        return;
    }

    let odd = n & 1 == 1;
    let even = n & !1;
    let half = even / 2;
    let (u0, u1) = (&u[..half], &u[half..even]);

    // U0² => v[0..even], U1² => v[even..2·even]
    {
        let (v0, v1) = v[..2 * even].split_at_mut(even);
        sqr_half(u0, v0, scratch);
        sqr_half(u1, v1, scratch);
    }

    let (tmp, rest) = scratch.split_at_mut(even);
    let mut carry = add_n(&v[..even], &v[even..2 * even], tmp);
    carry += add_assign_n(&mut v[half..half + even], tmp);

    let ord = cmp_n(u1, u0);
    if ord != Ordering::Equal {
        let diff = &mut tmp[..half];
        if ord == Ordering::Less {
            sub_n(u0, u1, diff);
        } else {
            sub_n(u1, u0, diff);
        }
        let (square, rest) = rest.split_at_mut(even);
        sqr_half(diff, square, rest);
        carry -= sub_assign_n(&mut v[half..half + even], square);
    }
    let overflow = add_scalar(&mut v[half + even..2 * even], carry);
    debug_assert_eq!(overflow, 0);

    if odd {
        // Add 2·u[n-1]·U[..n-1] and u[n-1]² at word n-1.
        let cy = dmul_add(&u[..even], u[even], &mut v[even..2 * even]);
        v[2 * even] = cy;
        let cy = dmul_add(u, u[even], &mut v[even..=2 * even]);
        v[2 * even + 1] = cy;
    }
}
