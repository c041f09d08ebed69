//! SM2 curve domain parameters and point encoding.
//!
//! Parameters are the recommended ones from GB/T 32918.5 (also
//! draft-shen-sm2-ecdsa Appendix D). A single immutable [`Curve`] value is
//! shared process-wide through [`sm2_p256`]; keys hold a reference to it
//! rather than abstracting over curve choice.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::arithmetic::field;
use crate::{Error, Result};

/// Domain parameters of the SM2 curve `y^2 = x^3 + ax + b` over the prime
/// field of order `p`, with base point `G = (gx, gy)` of order `n`.
#[derive(Debug)]
pub struct Curve {
    p: BigUint,
    a: BigUint,
    b: BigUint,
    gx: BigUint,
    gy: BigUint,
    n: BigUint,
    byte_len: usize,
}

static SM2_P256: Lazy<Curve> = Lazy::new(|| Curve {
    p: hex_uint("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFF"),
    // a = p - 3
    a: hex_uint("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFC"),
    b: hex_uint("28E9FA9E9D9F5E344D5A9E4BCF6509A7F39789F515AB8F92DDBCBD414D940E93"),
    gx: hex_uint("32C4AE2C1F1981195F9904466A39C9948FE30BBFF2660BE1715A4589334C74C7"),
    gy: hex_uint("BC3736A2F4F6779C59BDCEE36B692153D0A9877CC62A474002DF32E52139F0A0"),
    n: hex_uint("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123"),
    byte_len: 32,
});

fn hex_uint(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 16).expect("valid curve constant")
}

/// Returns the recommended SM2 curve, constructed once per process.
pub fn sm2_p256() -> &'static Curve {
    &SM2_P256
}

impl Curve {
    /// Prime modulus of the base field.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Curve coefficient `a`, fixed to `p - 3` for this curve family.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Curve coefficient `b`.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Order of the base-point group.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Width in bytes of a serialized coordinate or scalar.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Base point `G`.
    pub fn generator(&self) -> AffinePoint {
        AffinePoint::new(self.gx.clone(), self.gy.clone())
    }

    /// Serializes a field element or scalar as fixed-width big-endian
    /// bytes, without trimming leading zeros.
    pub fn field_bytes(&self, value: &BigUint) -> Vec<u8> {
        let raw = value.to_bytes_be();
        debug_assert!(raw.len() <= self.byte_len);
        let mut out = vec![0u8; self.byte_len];
        out[self.byte_len - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// Whether `point` satisfies the curve equation. The identity is not
    /// considered on the curve.
    pub fn contains(&self, point: &AffinePoint) -> bool {
        if point.is_identity() {
            return false;
        }
        let (x, y) = (point.x(), point.y());
        if x >= &self.p || y >= &self.p {
            return false;
        }
        let y2 = field::mul(y, y, &self.p);
        let x3 = field::mul(&field::mul(x, x, &self.p), x, &self.p);
        let ax = field::mul(&self.a, x, &self.p);
        y2 == field::add(&field::add(&x3, &ax, &self.p), &self.b, &self.p)
    }

    /// Builds an on-curve point from affine coordinates.
    pub(crate) fn point_from_coordinates(&self, x: BigUint, y: BigUint) -> Result<AffinePoint> {
        let point = AffinePoint::new(x, y);
        if self.contains(&point) {
            Ok(point)
        } else {
            Err(Error::InvalidPublicKey)
        }
    }

    /// Decodes a SEC1 point: uncompressed (`04 || x || y`) or compressed
    /// (`02`/`03 || x`).
    pub fn decode_point(&self, data: &[u8]) -> Result<AffinePoint> {
        match data.split_first() {
            Some((0x04, rest)) if rest.len() == 2 * self.byte_len => {
                let x = BigUint::from_bytes_be(&rest[..self.byte_len]);
                let y = BigUint::from_bytes_be(&rest[self.byte_len..]);
                self.point_from_coordinates(x, y)
            }
            Some((tag @ (0x02 | 0x03), rest)) if rest.len() == self.byte_len => {
                let x = BigUint::from_bytes_be(rest);
                if x >= self.p {
                    return Err(Error::InvalidPublicKey);
                }
                let x3 = field::mul(&field::mul(&x, &x, &self.p), &x, &self.p);
                let ax = field::mul(&self.a, &x, &self.p);
                let rhs = field::add(&field::add(&x3, &ax, &self.p), &self.b, &self.p);
                let mut y = field::sqrt(&rhs, &self.p).ok_or(Error::InvalidPublicKey)?;
                if parity(&y) != (*tag & 1) {
                    y = &self.p - &y;
                }
                self.point_from_coordinates(x, y)
            }
            _ => Err(Error::InvalidPublicKey),
        }
    }

    /// Encodes a point as SEC1 bytes, uncompressed or compressed.
    pub fn encode_point(&self, point: &AffinePoint, compress: bool) -> Vec<u8> {
        if compress {
            let mut out = Vec::with_capacity(1 + self.byte_len);
            out.push(0x02 | parity(point.y()));
            out.extend_from_slice(&self.field_bytes(point.x()));
            out
        } else {
            let mut out = Vec::with_capacity(1 + 2 * self.byte_len);
            out.push(0x04);
            out.extend_from_slice(&self.field_bytes(point.x()));
            out.extend_from_slice(&self.field_bytes(point.y()));
            out
        }
    }

    /// Samples a scalar in `[1, n - 1]`: `byte_len + 8` random bytes are
    /// reduced mod `n - 1` and shifted into range, so the extra 64 bits
    /// make the reduction bias negligible.
    pub(crate) fn rand_scalar<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> Result<BigUint> {
        let mut buf = vec![0u8; self.byte_len + 8];
        rng.try_fill_bytes(&mut buf)
            .map_err(|_| Error::RandomSource)?;
        let wide = BigUint::from_bytes_be(&buf);
        buf.zeroize();
        let bound = &self.n - BigUint::one();
        Ok(wide % &bound + BigUint::one())
    }
}

fn parity(y: &BigUint) -> u8 {
    y.to_bytes_be().last().copied().unwrap_or(0) & 1
}

/// Point on the SM2 curve in affine coordinates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AffinePoint {
    x: BigUint,
    y: BigUint,
    infinity: bool,
}

impl AffinePoint {
    pub(crate) fn new(x: BigUint, y: BigUint) -> Self {
        Self {
            x,
            y,
            infinity: false,
        }
    }

    /// The additive identity (point at infinity).
    pub fn identity() -> Self {
        Self {
            x: BigUint::zero(),
            y: BigUint::zero(),
            infinity: true,
        }
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// Affine `x` coordinate (zero for the identity).
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// Affine `y` coordinate (zero for the identity).
    pub fn y(&self) -> &BigUint {
        &self.y
    }
}
