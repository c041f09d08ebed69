//! SM2 Digital Signature Algorithm (SM2DSA, GB/T 32918.2).
//!
//! ## Usage
//!
//! ```
//! use gm_sm2::PrivateKey;
//! use gm_sm2::dsa::{Signature, SigningKey};
//! use gm_sm2::dsa::signature::{RandomizedSigner, Verifier};
//!
//! let mut rng = rand::rngs::OsRng;
//! let private_key = PrivateKey::generate(&mut rng)?;
//!
//! // Signing
//! let signing_key = SigningKey::new(&private_key)?;
//! let signature: Signature = signing_key.try_sign_with_rng(&mut rng, b"test message")?;
//!
//! // Verifying
//! signing_key.verifying_key().verify(b"test message", &signature)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod der;
mod signing;
mod verifying;

pub use signature;

pub use self::{
    signing::{SigningKey, sign_digest},
    verifying::{VerifyingKey, verify_digest},
};

use core::fmt::{self, Debug};

use num_bigint::BigUint;
use num_traits::Zero;

use crate::curve::sm2_p256;
use crate::{Error, HashFn, Result, sm3_hash};

/// Default signer distinguishing identifier, used when [`SignerOpts::uid`]
/// is not set.
pub const DEFAULT_UID: &[u8] = &[
    0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, //
    0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38,
];

/// Signing options: distinguishing identifier and hash selection.
#[derive(Clone, Debug)]
pub struct SignerOpts {
    /// Distinguishing identifier bound into `ZA`. `None` selects
    /// [`DEFAULT_UID`]; an explicitly empty uid is used as-is.
    pub uid: Option<Vec<u8>>,
    /// Hash constructor for `ZA` and the message digest.
    pub hash: HashFn,
}

impl SignerOpts {
    /// Resolved uid bytes.
    pub fn uid(&self) -> &[u8] {
        self.uid.as_deref().unwrap_or(DEFAULT_UID)
    }
}

impl Default for SignerOpts {
    fn default() -> Self {
        Self {
            uid: None,
            hash: sm3_hash,
        }
    }
}

/// SM2DSA signature: the scalar pair `(r, s)`, each in `[1, n - 1]`.
#[derive(Clone, Eq, PartialEq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

/// Fixed-width signature encoding: `r || s`.
pub type SignatureBytes = [u8; Signature::BYTE_SIZE];

impl Signature {
    /// Size of the fixed-width encoding in bytes.
    pub const BYTE_SIZE: usize = 64;

    /// Builds a signature from its scalar components, rejecting values
    /// outside `[1, n - 1]` with [`Error::MalformedSignature`].
    pub fn from_scalars(r: BigUint, s: BigUint) -> Result<Self> {
        let n = sm2_p256().n();
        if r.is_zero() || s.is_zero() || &r >= n || &s >= n {
            return Err(Error::MalformedSignature);
        }
        Ok(Self { r, s })
    }

    /// Parses the fixed-width `r || s` encoding.
    pub fn from_bytes(bytes: &SignatureBytes) -> Result<Self> {
        let (r, s) = bytes.split_at(Self::BYTE_SIZE / 2);
        Self::from_scalars(BigUint::from_bytes_be(r), BigUint::from_bytes_be(s))
    }

    /// Parses the fixed-width encoding from a slice of exactly
    /// [`Signature::BYTE_SIZE`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: &SignatureBytes = bytes.try_into().map_err(|_| Error::MalformedSignature)?;
        Self::from_bytes(bytes)
    }

    /// Fixed-width `r || s` encoding: two `byte_len`-wide big-endian
    /// blocks with no leading-zero trimming.
    pub fn to_bytes(&self) -> SignatureBytes {
        let curve = sm2_p256();
        let mut out = [0u8; Self::BYTE_SIZE];
        out[..Self::BYTE_SIZE / 2].copy_from_slice(&curve.field_bytes(&self.r));
        out[Self::BYTE_SIZE / 2..].copy_from_slice(&curve.field_bytes(&self.s));
        out
    }

    /// `r` component as fixed-width bytes.
    pub fn r_bytes(&self) -> Vec<u8> {
        sm2_p256().field_bytes(&self.r)
    }

    /// `s` component as fixed-width bytes.
    pub fn s_bytes(&self) -> Vec<u8> {
        sm2_p256().field_bytes(&self.s)
    }

    pub(crate) fn r(&self) -> &BigUint {
        &self.r
    }

    pub(crate) fn s(&self) -> &BigUint {
        &self.s
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dsa::Signature(")?;
        for byte in self.to_bytes() {
            write!(f, "{byte:02X}")?;
        }
        write!(f, ")")
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}
