#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigInt;

use fibdrv_bignum::Bignum;

fn words(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks(8)
        .map(|c| {
            let mut w = [0u8; 8];
            w[..c.len()].copy_from_slice(c);
            u64::from_le_bytes(w)
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    // Header: signs, split point, shift amount; the rest is two operands.
    let signs = data[0];
    let split = usize::from(data[1]) * 8;
    let shift = u64::from(data[2]);
    let body = &data[3..];
    let split = split.min(body.len());

    let mut a = Bignum::new();
    a.assign_words(&words(&body[..split]), signs & 1 == 1).unwrap();
    let mut b = Bignum::new();
    b.assign_words(&words(&body[split..]), signs & 2 == 2).unwrap();
    let (ra, rb) = (a.to_bigint(), b.to_bigint());

    let mut out = Bignum::new();
    a.add_to(&b, &mut out).unwrap();
    assert_eq!(out.to_bigint(), &ra + &rb);
    a.sub_to(&b, &mut out).unwrap();
    assert_eq!(out.to_bigint(), &ra - &rb);
    a.mul_to(&b, &mut out).unwrap();
    assert_eq!(out.to_bigint(), &ra * &rb);
    a.square_to(&mut out).unwrap();
    assert_eq!(out.to_bigint(), &ra * &ra);
    a.shl_to(shift, &mut out).unwrap();
    assert_eq!(out.to_bigint(), &ra << shift);

    let mut c = a.try_clone().unwrap();
    c.mul_in_place(&b).unwrap();
    assert_eq!(c.to_bigint(), &ra * &rb);
    c.add_in_place(&a).unwrap();
    assert_eq!(c.to_bigint(), &ra * &rb + &ra);
    assert!(!(c.is_zero() && c.is_negative()));
    let _ = BigInt::from(&c);
});
