//! SM2 public key encryption (GB/T 32918.4).
//!
//! A message is encrypted against a public key `P` by sampling an
//! ephemeral scalar `k` and deriving a keystream from the shared point
//! `k * P`; the ciphertext carries the ephemeral public point `C1`, the
//! masked payload `C2` and an integrity tag `C3`. Two component orderings
//! and two encodings are supported; decoding must be told which were used.
//!
//! ## Usage
//!
//! ```
//! use gm_sm2::PrivateKey;
//! use gm_sm2::pke::{DecryptingKey, EncryptingKey};
//!
//! let mut rng = rand::rngs::OsRng;
//! let private_key = PrivateKey::generate(&mut rng)?;
//!
//! let encrypting_key = EncryptingKey::new(private_key.public_key());
//! let ciphertext = encrypting_key.encrypt(&mut rng, b"plaintext")?;
//!
//! let decrypting_key = DecryptingKey::new(&private_key);
//! assert_eq!(decrypting_key.decrypt(&ciphertext)?, b"plaintext");
//! # Ok::<(), gm_sm2::Error>(())
//! ```

mod decrypting;
mod encrypting;

pub use self::{decrypting::DecryptingKey, encrypting::EncryptingKey};

use der::asn1::{OctetStringRef, UintRef};
use der::{Decode, Encode, Sequence};
use num_bigint::BigUint;
use subtle::ConstantTimeEq;

use crate::curve::{AffinePoint, Curve};
use crate::{Error, HashFn, Result, sm3_hash};

/// Maximum number of ephemeral scalars tried before encryption gives up on
/// an all-zero keystream.
pub const MAX_RETRY_LIMIT: u32 = 100;

/// Ciphertext component orderings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// Ephemeral point, tag, masked payload (the GB/T 32918 default).
    #[default]
    C1C3C2,
    /// Ephemeral point, masked payload, tag (legacy ordering).
    C1C2C3,
}

/// Encryption options: component ordering and hash selection.
#[derive(Clone, Copy, Debug)]
pub struct EncrypterOpts {
    /// Component ordering used by the bytes encoding.
    pub mode: Mode,
    /// Hash constructor driving the KDF and the integrity tag.
    pub hash: HashFn,
}

impl Default for EncrypterOpts {
    fn default() -> Self {
        Self {
            mode: Mode::C1C3C2,
            hash: sm3_hash,
        }
    }
}

/// Parsed ciphertext: ephemeral point `C1`, masked payload `C2` and
/// integrity tag `C3`.
#[derive(Clone, Debug)]
pub struct Cipher {
    c1: AffinePoint,
    c2: Vec<u8>,
    c3: Vec<u8>,
}

/// DER layout of a ciphertext (GM/T 0009). The SEQUENCE field order is
/// fixed; the mode only governs the bytes encoding.
#[derive(Sequence)]
struct DerCipher<'a> {
    x: UintRef<'a>,
    y: UintRef<'a>,
    digest: OctetStringRef<'a>,
    cipher: OctetStringRef<'a>,
}

impl Cipher {
    pub(crate) fn new(c1: AffinePoint, c2: Vec<u8>, c3: Vec<u8>) -> Self {
        Self { c1, c2, c3 }
    }

    /// Decodes the concatenated-bytes layout. `C1` may be uncompressed or
    /// compressed; `digest_size` is the tag width of the hash in use.
    pub fn from_bytes(curve: &Curve, data: &[u8], mode: Mode, digest_size: usize) -> Result<Self> {
        let c1_len = match data.first() {
            Some(0x04) => 1 + 2 * curve.byte_len(),
            Some(0x02 | 0x03) => 1 + curve.byte_len(),
            _ => return Err(Error::MalformedCiphertext),
        };
        if data.len() < c1_len + digest_size {
            return Err(Error::MalformedCiphertext);
        }
        let (c1, rest) = data.split_at(c1_len);
        let c1 = curve
            .decode_point(c1)
            .map_err(|_| Error::MalformedCiphertext)?;
        let (c2, c3) = match mode {
            Mode::C1C3C2 => {
                let (c3, c2) = rest.split_at(digest_size);
                (c2, c3)
            }
            Mode::C1C2C3 => rest.split_at(rest.len() - digest_size),
        };
        Ok(Self {
            c1,
            c2: c2.to_vec(),
            c3: c3.to_vec(),
        })
    }

    /// Encodes the concatenated-bytes layout with an uncompressed `C1`.
    pub fn to_bytes(&self, curve: &Curve, mode: Mode) -> Vec<u8> {
        let point = curve.encode_point(&self.c1, false);
        let mut out = Vec::with_capacity(point.len() + self.c2.len() + self.c3.len());
        out.extend_from_slice(&point);
        match mode {
            Mode::C1C3C2 => {
                out.extend_from_slice(&self.c3);
                out.extend_from_slice(&self.c2);
            }
            Mode::C1C2C3 => {
                out.extend_from_slice(&self.c2);
                out.extend_from_slice(&self.c3);
            }
        }
        out
    }

    /// Decodes the ASN.1 DER layout.
    pub fn from_der(curve: &Curve, data: &[u8]) -> Result<Self> {
        let parsed = DerCipher::from_der(data).map_err(|_| Error::MalformedCiphertext)?;
        let x = BigUint::from_bytes_be(parsed.x.as_bytes());
        let y = BigUint::from_bytes_be(parsed.y.as_bytes());
        let c1 = curve
            .point_from_coordinates(x, y)
            .map_err(|_| Error::MalformedCiphertext)?;
        Ok(Self {
            c1,
            c2: parsed.cipher.as_bytes().to_vec(),
            c3: parsed.digest.as_bytes().to_vec(),
        })
    }

    /// Encodes the ASN.1 DER layout.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let x = self.c1.x().to_bytes_be();
        let y = self.c1.y().to_bytes_be();
        let der = DerCipher {
            x: UintRef::new(&x).map_err(|_| Error::MalformedCiphertext)?,
            y: UintRef::new(&y).map_err(|_| Error::MalformedCiphertext)?,
            digest: OctetStringRef::new(&self.c3).map_err(|_| Error::MalformedCiphertext)?,
            cipher: OctetStringRef::new(&self.c2).map_err(|_| Error::MalformedCiphertext)?,
        };
        der.to_der().map_err(|_| Error::MalformedCiphertext)
    }

    /// Ephemeral public point `C1`.
    pub fn c1(&self) -> &AffinePoint {
        &self.c1
    }

    /// Masked payload `C2`.
    pub fn c2(&self) -> &[u8] {
        &self.c2
    }

    /// Integrity tag `C3`.
    pub fn c3(&self) -> &[u8] {
        &self.c3
    }
}

/// Constant-time check that every byte is zero.
fn is_all_zero(bytes: &[u8]) -> bool {
    let acc = bytes.iter().fold(0u8, |acc, b| acc | b);
    acc.ct_eq(&0u8).into()
}
