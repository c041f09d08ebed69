//! Group operations on the SM2 curve.
//!
//! Points are tracked internally in Jacobian projective coordinates so a
//! scalar multiplication needs a single field inversion. Addition uses the
//! `add-2007-bl` formulas and doubling `dbl-2001-b`, which is valid here
//! because the curve fixes `a = p - 3`.

pub(crate) mod field;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::curve::{AffinePoint, Curve};

/// Point in Jacobian coordinates `(X, Y, Z)` representing the affine point
/// `(X/Z^2, Y/Z^3)`. `Z = 0` encodes the identity.
#[derive(Clone)]
pub(crate) struct JacobianPoint {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

impl JacobianPoint {
    fn identity() -> Self {
        Self {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    fn from_affine(point: &AffinePoint) -> Self {
        if point.is_identity() {
            Self::identity()
        } else {
            Self {
                x: point.x().clone(),
                y: point.y().clone(),
                z: BigUint::one(),
            }
        }
    }

    fn is_identity(&self) -> bool {
        self.z.is_zero()
    }
}

impl Curve {
    /// `k * G`
    pub(crate) fn mul_base(&self, k: &BigUint) -> AffinePoint {
        self.mul_point(&self.generator(), k)
    }

    /// `k * point`, binary double-and-add.
    pub(crate) fn mul_point(&self, point: &AffinePoint, k: &BigUint) -> AffinePoint {
        let base = JacobianPoint::from_affine(point);
        let mut acc = JacobianPoint::identity();
        for byte in k.to_bytes_be() {
            for bit in (0..8).rev() {
                acc = self.double_jacobian(&acc);
                if (byte >> bit) & 1 == 1 {
                    acc = self.add_jacobian(&acc, &base);
                }
            }
        }
        self.to_affine(&acc)
    }

    /// `u1 * G + u2 * point`, as needed by signature verification.
    pub(crate) fn lincomb(&self, u1: &BigUint, u2: &BigUint, point: &AffinePoint) -> AffinePoint {
        let lhs = JacobianPoint::from_affine(&self.mul_base(u1));
        let rhs = JacobianPoint::from_affine(&self.mul_point(point, u2));
        self.to_affine(&self.add_jacobian(&lhs, &rhs))
    }

    /// `a + b` in affine coordinates.
    pub(crate) fn add_points(&self, a: &AffinePoint, b: &AffinePoint) -> AffinePoint {
        let sum = self.add_jacobian(
            &JacobianPoint::from_affine(a),
            &JacobianPoint::from_affine(b),
        );
        self.to_affine(&sum)
    }

    fn to_affine(&self, point: &JacobianPoint) -> AffinePoint {
        if point.is_identity() {
            return AffinePoint::identity();
        }
        let p = self.p();
        let z_inv = field::inv(&point.z, p);
        let z_inv2 = field::mul(&z_inv, &z_inv, p);
        let z_inv3 = field::mul(&z_inv2, &z_inv, p);
        let x = field::mul(&point.x, &z_inv2, p);
        let y = field::mul(&point.y, &z_inv3, p);
        AffinePoint::new(x, y)
    }

    /// Jacobian doubling, `dbl-2001-b`, specialized to `a = p - 3`.
    fn double_jacobian(&self, a: &JacobianPoint) -> JacobianPoint {
        if a.is_identity() {
            return JacobianPoint::identity();
        }
        let p = self.p();

        let delta = field::mul(&a.z, &a.z, p);
        let gamma = field::mul(&a.y, &a.y, p);
        let beta = field::mul(&a.x, &gamma, p);

        // alpha = 3 * (x - delta) * (x + delta)
        let t = field::mul(
            &field::sub(&a.x, &delta, p),
            &field::add(&a.x, &delta, p),
            p,
        );
        let alpha = field::add(&field::dbl(&t, p), &t, p);

        let beta4 = field::dbl(&field::dbl(&beta, p), p);
        let beta8 = field::dbl(&beta4, p);
        let x3 = field::sub(&field::mul(&alpha, &alpha, p), &beta8, p);

        let yz = field::add(&a.y, &a.z, p);
        let z3 = field::sub(
            &field::sub(&field::mul(&yz, &yz, p), &gamma, p),
            &delta,
            p,
        );

        let gamma2 = field::mul(&gamma, &gamma, p);
        let gamma2_8 = field::dbl(&field::dbl(&field::dbl(&gamma2, p), p), p);
        let y3 = field::sub(
            &field::mul(&alpha, &field::sub(&beta4, &x3, p), p),
            &gamma2_8,
            p,
        );

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Jacobian addition, `add-2007-bl`.
    fn add_jacobian(&self, a: &JacobianPoint, b: &JacobianPoint) -> JacobianPoint {
        if a.is_identity() {
            return b.clone();
        }
        if b.is_identity() {
            return a.clone();
        }
        let p = self.p();

        let z1z1 = field::mul(&a.z, &a.z, p);
        let z2z2 = field::mul(&b.z, &b.z, p);
        let u1 = field::mul(&a.x, &z2z2, p);
        let u2 = field::mul(&b.x, &z1z1, p);
        let s1 = field::mul(&a.y, &field::mul(&b.z, &z2z2, p), p);
        let s2 = field::mul(&b.y, &field::mul(&a.z, &z1z1, p), p);
        let h = field::sub(&u2, &u1, p);
        let r = field::sub(&s2, &s1, p);

        if h.is_zero() {
            if r.is_zero() {
                // same point
                return self.double_jacobian(a);
            }
            // opposite points
            return JacobianPoint::identity();
        }

        let i = {
            let h2 = field::dbl(&h, p);
            field::mul(&h2, &h2, p)
        };
        let j = field::mul(&h, &i, p);
        let r2 = field::dbl(&r, p);
        let v = field::mul(&u1, &i, p);

        let mut x3 = field::sub(&field::mul(&r2, &r2, p), &j, p);
        x3 = field::sub(&x3, &field::dbl(&v, p), p);

        let mut y3 = field::mul(&r2, &field::sub(&v, &x3, p), p);
        y3 = field::sub(&y3, &field::dbl(&field::mul(&s1, &j, p), p), p);

        let zz = field::add(&a.z, &b.z, p);
        let z3 = field::mul(
            &field::sub(&field::sub(&field::mul(&zz, &zz, p), &z1z1, p), &z2z2, p),
            &h,
            p,
        );

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::curve::sm2_p256;
    use num_bigint::BigUint;

    #[test]
    fn generator_is_on_curve() {
        let curve = sm2_p256();
        assert!(curve.contains(&curve.generator()));
    }

    #[test]
    fn scalar_mul_matches_repeated_addition() {
        let curve = sm2_p256();
        let g = curve.generator();
        let two_g = curve.add_points(&g, &g);
        let three_g = curve.add_points(&two_g, &g);
        assert_eq!(curve.mul_base(&BigUint::from(2u32)), two_g);
        assert_eq!(curve.mul_base(&BigUint::from(3u32)), three_g);
        assert!(curve.contains(&two_g));
        assert!(curve.contains(&three_g));
    }

    #[test]
    fn scalar_mul_distributes_over_addition() {
        let curve = sm2_p256();
        let a = BigUint::from(987_654_321u64);
        let b = BigUint::from(123_456_789u64);
        let sum = curve.add_points(&curve.mul_base(&a), &curve.mul_base(&b));
        assert_eq!(curve.mul_base(&(&a + &b)), sum);
    }

    #[test]
    fn order_times_generator_is_identity() {
        let curve = sm2_p256();
        assert!(curve.mul_base(curve.n()).is_identity());
    }

    #[test]
    fn lincomb_matches_separate_multiplications() {
        let curve = sm2_p256();
        let point = curve.mul_base(&BigUint::from(5u32));
        let u1 = BigUint::from(11u32);
        let u2 = BigUint::from(7u32);
        let expected = curve.add_points(&curve.mul_base(&u1), &curve.mul_point(&point, &u2));
        assert_eq!(curve.lincomb(&u1, &u2, &point), expected);
    }
}
