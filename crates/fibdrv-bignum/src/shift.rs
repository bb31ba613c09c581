//! Sub-word left shifts of digit sequences.
//!
//! Shift amounts must be below the digit width; whole-word moves are done
//! by the caller.

use crate::constants::DIGIT_BITS;

/// `w = u << bits`, returning the bits shifted out of the top word.
pub fn lshift(u: &[u64], bits: u32, w: &mut [u64]) -> u64 {
    debug_assert_eq!(u.len(), w.len());
    debug_assert!(bits < DIGIT_BITS);
    if bits == 0 {
        w.copy_from_slice(u);
        return 0;
    }

    let back = DIGIT_BITS - bits;
    let mut q = 0u64;
    for (&p, wd) in u.iter().zip(w.iter_mut()) {
        *wd = (p << bits) | q;
        q = p >> back;
    }
    q
}

/// `u <<= bits` in place, returning the bits shifted out of the top word.
pub fn lshift_in_place(u: &mut [u64], bits: u32) -> u64 {
    debug_assert!(bits < DIGIT_BITS);
    if bits == 0 {
        return 0;
    }

    let back = DIGIT_BITS - bits;
    let mut q = 0u64;
    for d in u.iter_mut() {
        let p = *d;
        *d = (p << bits) | q;
        q = p >> back;
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_zero_copies() {
        let mut w = [0; 2];
        assert_eq!(lshift(&[7, 8], 0, &mut w), 0);
        assert_eq!(w, [7, 8]);
        let mut u = [7, 8];
        assert_eq!(lshift_in_place(&mut u, 0), 0);
        assert_eq!(u, [7, 8]);
    }

    #[test]
    fn shift_carries_between_words() {
        let mut w = [0; 2];
        let out = lshift(&[0x8000_0000_0000_0001, 0xF000_0000_0000_0000], 4, &mut w);
        assert_eq!(w, [0x10, 0x8]);
        assert_eq!(out, 0xF);
    }

    #[test]
    fn in_place_matches_out_of_place() {
        let u = [0x0123_4567_89AB_CDEF, u64::MAX, 1, 0x8000_0000_0000_0000];
        for bits in 0..64 {
            let mut w = [0; 4];
            let a = lshift(&u, bits, &mut w);
            let mut v = u;
            let b = lshift_in_place(&mut v, bits);
            assert_eq!((a, w), (b, v), "bits = {bits}");
        }
    }

    #[test]
    fn shift_empty() {
        assert_eq!(lshift(&[], 5, &mut []), 0);
        assert_eq!(lshift_in_place(&mut [], 5), 0);
    }
}
