//! SM2 public keys.

use core::ptr;

use subtle::{Choice, ConstantTimeEq};

use crate::curve::{AffinePoint, Curve, sm2_p256};
use crate::Result;

/// SM2 public key: a non-identity point on the curve, held together with a
/// reference to the curve domain it belongs to.
#[derive(Clone, Debug)]
pub struct PublicKey {
    curve: &'static Curve,
    point: AffinePoint,
}

impl PublicKey {
    /// Decodes a SEC1-encoded point, uncompressed (`04`) or compressed
    /// (`02`/`03`), validating it against the curve equation.
    ///
    /// Fails with [`crate::Error::InvalidPublicKey`] otherwise.
    pub fn from_sec1_bytes(data: &[u8]) -> Result<Self> {
        let curve = sm2_p256();
        let point = curve.decode_point(data)?;
        Ok(Self { curve, point })
    }

    /// Serializes as an uncompressed SEC1 point (`04 || x || y`).
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.curve.encode_point(&self.point, false)
    }

    /// Serializes as a compressed SEC1 point (`02`/`03 || x`).
    pub fn to_compressed_sec1_bytes(&self) -> Vec<u8> {
        self.curve.encode_point(&self.point, true)
    }

    /// The curve point itself.
    pub fn point(&self) -> &AffinePoint {
        &self.point
    }

    /// Curve domain this key belongs to.
    pub fn curve(&self) -> &'static Curve {
        self.curve
    }

    pub(crate) fn from_point_unchecked(curve: &'static Curve, point: AffinePoint) -> Self {
        Self { curve, point }
    }
}

//
// Other trait impls
//

impl ConstantTimeEq for PublicKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        let same_curve = Choice::from(u8::from(ptr::eq(self.curve, other.curve)));
        let x = self.curve.field_bytes(self.point.x());
        let y = self.curve.field_bytes(self.point.y());
        let other_x = other.curve.field_bytes(other.point.x());
        let other_y = other.curve.field_bytes(other.point.y());
        same_curve
            & x.as_slice().ct_eq(other_x.as_slice())
            & y.as_slice().ct_eq(other_y.as_slice())
    }
}

/// Constant-time comparison
impl Eq for PublicKey {}
impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl AsRef<AffinePoint> for PublicKey {
    fn as_ref(&self) -> &AffinePoint {
        &self.point
    }
}

#[cfg(test)]
mod tests {
    use super::PublicKey;
    use crate::{Error, PrivateKey};

    #[test]
    fn sec1_round_trips() {
        let key = PrivateKey::from_slice(&[0x17; 32]).unwrap();
        let public_key = key.public_key();

        let uncompressed = public_key.to_sec1_bytes();
        assert_eq!(
            &PublicKey::from_sec1_bytes(&uncompressed).unwrap(),
            public_key
        );

        let compressed = public_key.to_compressed_sec1_bytes();
        assert_eq!(
            &PublicKey::from_sec1_bytes(&compressed).unwrap(),
            public_key
        );
    }

    #[test]
    fn rejects_off_curve_bytes() {
        let key = PrivateKey::from_slice(&[0x17; 32]).unwrap();
        let mut encoded = key.public_key().to_sec1_bytes();
        encoded[40] ^= 1;
        assert_eq!(
            PublicKey::from_sec1_bytes(&encoded).unwrap_err(),
            Error::InvalidPublicKey
        );
    }

    #[test]
    fn equality_is_value_based() {
        let a = PrivateKey::from_slice(&[0x21; 32]).unwrap();
        let b = PrivateKey::from_slice(&a.to_bytes()).unwrap();
        let c = PrivateKey::from_slice(&[0x22; 32]).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_ne!(a.public_key(), c.public_key());
    }
}
