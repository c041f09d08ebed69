//! SM2 private keys.

use core::fmt::{self, Debug};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};

use crate::curve::{Curve, sm2_p256};
use crate::{Error, PublicKey, Result};

/// SM2 private key: the secret scalar `d` with `0 < d < n - 1`, together
/// with the public key `d * G` it determines.
#[derive(Clone)]
pub struct PrivateKey {
    public_key: PublicKey,
    d: BigUint,
}

impl PrivateKey {
    /// Generates a fresh key pair from the supplied randomness source.
    ///
    /// Fails only when the randomness source does, with
    /// [`Error::RandomSource`].
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Self> {
        let curve = sm2_p256();
        let d = curve.rand_scalar(rng)?;
        Ok(Self::from_scalar(curve, d))
    }

    /// Reconstructs a private key from a big-endian scalar.
    ///
    /// Fails with [`Error::InvalidPrivateKey`] when the scalar is zero or
    /// does not lie below `n - 1`.
    pub fn from_slice(d: &[u8]) -> Result<Self> {
        let curve = sm2_p256();
        let d = BigUint::from_bytes_be(d);
        if d.is_zero() || d >= curve.n() - BigUint::one() {
            return Err(Error::InvalidPrivateKey);
        }
        Ok(Self::from_scalar(curve, d))
    }

    fn from_scalar(curve: &'static Curve, d: BigUint) -> Self {
        let point = curve.mul_base(&d);
        Self {
            public_key: PublicKey::from_point_unchecked(curve, point),
            d,
        }
    }

    /// Serializes the secret scalar as fixed-width big-endian bytes.
    ///
    /// The returned bytes are key material.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.curve().field_bytes(&self.d)
    }

    /// Public half of the key pair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Curve domain this key belongs to.
    pub fn curve(&self) -> &'static Curve {
        self.public_key.curve()
    }

    pub(crate) fn d(&self) -> &BigUint {
        &self.d
    }
}

//
// Other trait impls
//

impl ConstantTimeEq for PrivateKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        let d = self.curve().field_bytes(&self.d);
        let other_d = other.curve().field_bytes(&other.d);
        d.as_slice().ct_eq(other_d.as_slice()) & self.public_key.ct_eq(&other.public_key)
    }
}

/// Constant-time comparison
impl Eq for PrivateKey {}
impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
