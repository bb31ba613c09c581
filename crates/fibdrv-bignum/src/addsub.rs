//! Carry-propagating addition and subtraction of digit sequences.
//!
//! Out-of-place functions take `(u, v, w)` with `w` the destination. The
//! `*_assign` forms use the destination as the first operand. Lengths are
//! preconditions checked with `debug_assert!`.

/// Add one to `u`, returning the carry out. An empty slice carries.
#[inline]
pub fn inc(u: &mut [u64]) -> u64 {
    for d in u.iter_mut() {
        *d = d.wrapping_add(1);
        if *d != 0 {
            return 0;
        }
    }
    1
}

/// Subtract one from `u`, returning the borrow out. An empty slice borrows.
#[inline]
pub fn dec(u: &mut [u64]) -> u64 {
    for d in u.iter_mut() {
        let old = *d;
        *d = old.wrapping_sub(1);
        if old != 0 {
            return 0;
        }
    }
    1
}

/// Add `s` to `u`, returning the carry out.
pub fn add_scalar(u: &mut [u64], s: u64) -> u64 {
    if s == 0 {
        return 0;
    }
    match u.split_first_mut() {
        None => s,
        Some((first, rest)) => {
            let (sum, carry) = first.overflowing_add(s);
            *first = sum;
            if carry {
                inc(rest)
            } else {
                0
            }
        }
    }
}

/// `w = u + v` over equal lengths, returning the carry out.
///
/// The incoming carry and the word pair are folded in two separate steps, so
/// each step can wrap at most once and the carry stays a single bit.
pub fn add_n(u: &[u64], v: &[u64], w: &mut [u64]) -> u64 {
    debug_assert!(u.len() == v.len() && w.len() == u.len());
    let mut cy = 0u64;
    for ((&ud, &vd), wd) in u.iter().zip(v).zip(w.iter_mut()) {
        let ud = ud.wrapping_add(cy);
        cy = u64::from(ud < cy);
        *wd = ud.wrapping_add(vd);
        cy += u64::from(*wd < vd);
    }
    cy
}

/// `w += v` over equal lengths, returning the carry out.
pub fn add_assign_n(w: &mut [u64], v: &[u64]) -> u64 {
    debug_assert_eq!(w.len(), v.len());
    let mut cy = 0u64;
    for (wd, &vd) in w.iter_mut().zip(v) {
        let vd = vd.wrapping_add(cy);
        cy = u64::from(vd < cy);
        *wd = wd.wrapping_add(vd);
        cy += u64::from(*wd < vd);
    }
    cy
}

/// `w = u + v` for operands of any lengths; `w` is as long as the longer.
pub fn add(u: &[u64], v: &[u64], w: &mut [u64]) -> u64 {
    let (long, short) = if u.len() >= v.len() { (u, v) } else { (v, u) };
    debug_assert_eq!(w.len(), long.len());
    let n = short.len();
    let (lo, hi) = w.split_at_mut(n);
    let cy = add_n(&long[..n], short, lo);
    hi.copy_from_slice(&long[n..]);
    if cy == 0 {
        0
    } else {
        inc(hi)
    }
}

/// `w += v` where `w` is at least as long as `v`.
pub fn add_assign(w: &mut [u64], v: &[u64]) -> u64 {
    debug_assert!(w.len() >= v.len());
    let (lo, hi) = w.split_at_mut(v.len());
    if add_assign_n(lo, v) == 0 {
        0
    } else {
        inc(hi)
    }
}

/// `w = u - v` over equal lengths, returning the borrow out.
pub fn sub_n(u: &[u64], v: &[u64], w: &mut [u64]) -> u64 {
    debug_assert!(u.len() == v.len() && w.len() == u.len());
    let mut cy = 0u64;
    for ((&ud, &vd), wd) in u.iter().zip(v).zip(w.iter_mut()) {
        let vd = vd.wrapping_add(cy);
        cy = u64::from(vd < cy);
        *wd = ud.wrapping_sub(vd);
        cy += u64::from(*wd > ud);
    }
    cy
}

/// `w -= v` over equal lengths, returning the borrow out.
pub fn sub_assign_n(w: &mut [u64], v: &[u64]) -> u64 {
    debug_assert_eq!(w.len(), v.len());
    let mut cy = 0u64;
    for (wd, &vd) in w.iter_mut().zip(v) {
        let ud = *wd;
        let vd = vd.wrapping_add(cy);
        cy = u64::from(vd < cy);
        *wd = ud.wrapping_sub(vd);
        cy += u64::from(*wd > ud);
    }
    cy
}

/// `w = v - w` over equal lengths, returning the borrow out.
pub fn rsub_assign_n(w: &mut [u64], v: &[u64]) -> u64 {
    debug_assert_eq!(w.len(), v.len());
    let mut cy = 0u64;
    for (wd, &ud) in w.iter_mut().zip(v) {
        let vd = wd.wrapping_add(cy);
        cy = u64::from(vd < cy);
        *wd = ud.wrapping_sub(vd);
        cy += u64::from(*wd > ud);
    }
    cy
}

/// `w = u - v` where `u` is at least as long as `v`; `w` is as long as `u`.
pub fn sub(u: &[u64], v: &[u64], w: &mut [u64]) -> u64 {
    debug_assert!(u.len() >= v.len() && w.len() == u.len());
    let n = v.len();
    let (lo, hi) = w.split_at_mut(n);
    let cy = sub_n(&u[..n], v, lo);
    hi.copy_from_slice(&u[n..]);
    if cy == 0 {
        0
    } else {
        dec(hi)
    }
}

/// `w -= v` where `w` is at least as long as `v`.
pub fn sub_assign(w: &mut [u64], v: &[u64]) -> u64 {
    debug_assert!(w.len() >= v.len());
    let (lo, hi) = w.split_at_mut(v.len());
    if sub_assign_n(lo, v) == 0 {
        0
    } else {
        dec(hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: u64 = u64::MAX;

    #[test]
    fn inc_and_dec_propagate() {
        let mut u = [M, M, 3];
        assert_eq!(inc(&mut u), 0);
        assert_eq!(u, [0, 0, 4]);
        assert_eq!(dec(&mut u), 0);
        assert_eq!(u, [M, M, 3]);

        let mut all = [M, M];
        assert_eq!(inc(&mut all), 1);
        assert_eq!(all, [0, 0]);
        assert_eq!(dec(&mut all), 1);
        assert_eq!(all, [M, M]);

        assert_eq!(inc(&mut []), 1);
        assert_eq!(dec(&mut []), 1);
    }

    #[test]
    fn add_scalar_carries() {
        let mut u = [M - 1, M, 0];
        assert_eq!(add_scalar(&mut u, 3), 0);
        assert_eq!(u, [1, 0, 1]);
        assert_eq!(add_scalar(&mut [], 5), 5);
        assert_eq!(add_scalar(&mut [M], 1), 1);
    }

    #[test]
    fn add_n_all_ones() {
        let mut w = [0; 3];
        let cy = add_n(&[M, M, M], &[M, M, M], &mut w);
        assert_eq!(cy, 1);
        assert_eq!(w, [M - 1, M, M]);

        let cy = add_n(&[M, M, M], &[1, 0, 0], &mut w);
        assert_eq!(cy, 1);
        assert_eq!(w, [0, 0, 0]);
    }

    #[test]
    fn add_unequal_lengths() {
        let mut w = [0; 4];
        let cy = add(&[1], &[M, M, M, 7], &mut w);
        assert_eq!(cy, 0);
        assert_eq!(w, [0, 0, 0, 8]);

        let mut w = [0; 3];
        let cy = add(&[M, M, M], &[2, 0], &mut w);
        assert_eq!(cy, 1);
        assert_eq!(w, [1, 0, 0]);
    }

    #[test]
    fn add_assign_matches_out_of_place() {
        let u = [M, 5, M, 1];
        let v = [3, M, 9];
        let mut out = [0; 4];
        let cy = add(&u, &v, &mut out);

        let mut w = u;
        assert_eq!(add_assign(&mut w, &v), cy);
        assert_eq!(w, out);
    }

    #[test]
    fn sub_borrows() {
        let mut w = [0; 3];
        let cy = sub_n(&[0, 0, 1], &[1, 0, 0], &mut w);
        assert_eq!(cy, 0);
        assert_eq!(w, [M, M, 0]);

        let cy = sub_n(&[0, 0, 0], &[1, 0, 0], &mut w);
        assert_eq!(cy, 1);
        assert_eq!(w, [M, M, M]);
    }

    #[test]
    fn sub_unequal_and_in_place() {
        let u = [0, 0, 0, 5];
        let v = [1, M];
        let mut out = [0; 4];
        assert_eq!(sub(&u, &v, &mut out), 0);
        assert_eq!(out, [M, 0, M, 4]);

        let mut w = u;
        assert_eq!(sub_assign(&mut w, &v), 0);
        assert_eq!(w, out);
    }

    #[test]
    fn rsub_assign_reverses_operands() {
        let mut w = [1, 2];
        let borrow = rsub_assign_n(&mut w, &[5, 9]);
        assert_eq!(borrow, 0);
        assert_eq!(w, [4, 7]);

        let mut w = [0, 1];
        let mut expected = [0; 2];
        let b1 = sub_n(&[M, 0], &[0, 1], &mut expected);
        let b2 = rsub_assign_n(&mut w, &[M, 0]);
        assert_eq!((w, b2), (expected, b1));
    }

    #[test]
    fn sub_assign_n_matches_sub_n() {
        let u = [3, M, 0, 8];
        let v = [4, M, 1, 2];
        let mut out = [0; 4];
        let b = sub_n(&u, &v, &mut out);
        let mut w = u;
        assert_eq!(sub_assign_n(&mut w, &v), b);
        assert_eq!(w, out);
    }
}
