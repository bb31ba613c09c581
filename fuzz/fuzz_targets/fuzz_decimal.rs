#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigInt;

use fibdrv_bignum::Bignum;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing must never panic; accepted input must agree with num-bigint.
    match s.parse::<Bignum>() {
        Ok(n) => {
            let reference: BigInt = s.parse().expect("num-bigint rejected a valid number");
            assert_eq!(n.to_bigint(), reference);
            assert_eq!(n.to_dec_string().unwrap(), reference.to_string());
        }
        Err(_) => {}
    }
});
