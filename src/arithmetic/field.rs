//! Modular helper functions, shared by the base field (mod `p`) and the
//! scalar field (mod `n`).
//!
//! Every function expects reduced inputs and returns a reduced value.

use num_bigint::BigUint;
use num_traits::One;

/// `(a + b) mod m`
pub(crate) fn add(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let mut r = a + b;
    if r >= *m {
        r -= m;
    }
    r
}

/// `(a - b) mod m`
pub(crate) fn sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    if a >= b { a - b } else { m - (b - a) }
}

/// `(2 * a) mod m`
pub(crate) fn dbl(a: &BigUint, m: &BigUint) -> BigUint {
    add(a, a, m)
}

/// `(a * b) mod m`
pub(crate) fn mul(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// `a^-1 mod m` via Fermat's little theorem. `m` must be prime and `a`
/// non-zero mod `m`.
pub(crate) fn inv(a: &BigUint, m: &BigUint) -> BigUint {
    let e = m - BigUint::from(2u32);
    a.modpow(&e, m)
}

/// Square root mod `m` for `m ≡ 3 (mod 4)`, or `None` when `a` is not a
/// quadratic residue.
pub(crate) fn sqrt(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let e = (m + BigUint::one()) >> 2usize;
    let r = a.modpow(&e, m);
    if mul(&r, &r, m) == *a { Some(r) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::sm2_p256;
    use num_traits::One;

    #[test]
    fn subtraction_wraps_into_range() {
        let p = sm2_p256().p();
        let one = BigUint::one();
        let two = BigUint::from(2u32);
        assert_eq!(sub(&one, &two, p), p - &one);
        assert_eq!(sub(&two, &two, p), BigUint::from(0u32));
    }

    #[test]
    fn inversion_round_trips() {
        let p = sm2_p256().p();
        let a = BigUint::from(0xDEADBEEFu32);
        assert_eq!(mul(&a, &inv(&a, p), p), BigUint::one());
    }

    #[test]
    fn sqrt_of_square_round_trips() {
        let p = sm2_p256().p();
        let a = BigUint::from(0x1234_5678u32);
        let square = mul(&a, &a, p);
        let root = sqrt(&square, p).expect("square has a root");
        assert!(root == a || root == p - &a);
    }
}
