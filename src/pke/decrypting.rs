//! Support for SM2 decryption.
//!
//! ```text
//! B1: get C1 from C, verify it satisfies the curve equation
//! B3: [d]C1 = (x2, y2)
//! B4: t = KDF(x2 || y2, klen), fail if t is all zero
//! B5: M' = C2 xor t
//! B6: u = Hash(x2 || M' || y2), fail if u != C3
//! ```

use core::fmt::{self, Debug};

use sm3::digest::DynDigest;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use super::{Cipher, EncrypterOpts, EncryptingKey, Mode, is_all_zero};
use crate::kdf::kdf;
use crate::{Error, PrivateKey, Result};

/// Key used for decrypting messages: a private key plus encryption
/// options.
#[derive(Clone)]
pub struct DecryptingKey {
    private_key: PrivateKey,
    opts: EncrypterOpts,
}

impl DecryptingKey {
    /// Creates a decrypting key with the default options (`C1C3C2`, SM3).
    pub fn new(private_key: &PrivateKey) -> Self {
        Self::new_with_opts(private_key, EncrypterOpts::default())
    }

    /// Creates a decrypting key with explicit options.
    pub fn new_with_opts(private_key: &PrivateKey, opts: EncrypterOpts) -> Self {
        Self {
            private_key: private_key.clone(),
            opts,
        }
    }

    /// Creates a decrypting key from a big-endian secret scalar.
    pub fn from_slice(d: &[u8]) -> Result<Self> {
        Ok(Self::new(&PrivateKey::from_slice(d)?))
    }

    /// Underlying private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Component ordering used by the bytes encoding.
    pub fn mode(&self) -> Mode {
        self.opts.mode
    }

    /// The [`EncryptingKey`] which corresponds to this key.
    pub fn encrypting_key(&self) -> EncryptingKey {
        EncryptingKey::new_with_opts(self.private_key.public_key(), self.opts)
    }

    /// Decrypts a concatenated-bytes ciphertext.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let digest_size = (self.opts.hash)().output_size();
        let cipher = Cipher::from_bytes(
            self.private_key.curve(),
            ciphertext,
            self.opts.mode,
            digest_size,
        )?;
        decrypt(&self.private_key, &cipher, &self.opts)
    }

    /// Decrypts an ASN.1 DER ciphertext.
    pub fn decrypt_der(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Cipher::from_der(self.private_key.curve(), ciphertext)?;
        decrypt(&self.private_key, &cipher, &self.opts)
    }
}

//
// Other trait impls
//

impl ConstantTimeEq for DecryptingKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.private_key.ct_eq(&other.private_key)
    }
}

/// Constant-time comparison
impl Eq for DecryptingKey {}
impl PartialEq for DecryptingKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Debug for DecryptingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptingKey")
            .field("public_key", self.private_key.public_key())
            .field("mode", &self.opts.mode)
            .finish_non_exhaustive()
    }
}

/// Core decryption. Every failure after structural parsing collapses to
/// [`Error::DecryptionFailed`]; the tag comparison is constant time.
pub(crate) fn decrypt(
    private_key: &PrivateKey,
    cipher: &Cipher,
    opts: &EncrypterOpts,
) -> Result<Vec<u8>> {
    let curve = private_key.curve();

    // B3: (x2, y2) = [d]C1
    let shared = curve.mul_point(cipher.c1(), private_key.d());
    if shared.is_identity() {
        return Err(Error::DecryptionFailed);
    }
    let mut x2 = curve.field_bytes(shared.x());
    let mut y2 = curve.field_bytes(shared.y());

    // B4: t = KDF(x2 || y2, klen)
    let mut seed = Vec::with_capacity(x2.len() + y2.len());
    seed.extend_from_slice(&x2);
    seed.extend_from_slice(&y2);
    let mut t = kdf(opts.hash, &seed, cipher.c2().len());
    seed.zeroize();

    if !t.is_empty() && is_all_zero(&t) {
        x2.zeroize();
        y2.zeroize();
        return Err(Error::DecryptionFailed);
    }

    // B5: M' = C2 xor t
    for (tb, cb) in t.iter_mut().zip(cipher.c2()) {
        *tb ^= cb;
    }

    // B6: u = Hash(x2 || M' || y2)
    let mut md = (opts.hash)();
    md.update(&x2);
    md.update(&t);
    md.update(&y2);
    let tag = md.finalize_reset();
    x2.zeroize();
    y2.zeroize();

    if bool::from(tag.ct_eq(cipher.c3())) {
        Ok(t)
    } else {
        Err(Error::DecryptionFailed)
    }
}
