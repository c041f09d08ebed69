//! Support for SM2 encryption.
//!
//! ```text
//! A1: generate a random number k in [1, n-1]
//! A2: C1 = [k]G = (x1, y1)
//! A4: [k]PB = (x2, y2)
//! A5: t = KDF(x2 || y2, klen), return to A1 if t is all zero
//! A6: C2 = M xor t
//! A7: C3 = Hash(x2 || M || y2)
//! ```

use rand_core::CryptoRngCore;
use sm3::digest::DynDigest;
use zeroize::Zeroize;

use super::{Cipher, EncrypterOpts, MAX_RETRY_LIMIT, Mode, is_all_zero};
use crate::kdf::kdf;
use crate::{Error, PublicKey, Result};

/// Key used for encrypting messages: a public key plus encryption options.
#[derive(Clone, Debug)]
pub struct EncryptingKey {
    public_key: PublicKey,
    opts: EncrypterOpts,
}

impl EncryptingKey {
    /// Creates an encrypting key with the default options (`C1C3C2`, SM3).
    pub fn new(public_key: &PublicKey) -> Self {
        Self::new_with_opts(public_key, EncrypterOpts::default())
    }

    /// Creates an encrypting key with explicit options.
    pub fn new_with_opts(public_key: &PublicKey, opts: EncrypterOpts) -> Self {
        Self {
            public_key: public_key.clone(),
            opts,
        }
    }

    /// Creates an encrypting key from a SEC1-encoded public key.
    pub fn from_sec1_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(&PublicKey::from_sec1_bytes(data)?))
    }

    /// Underlying public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Component ordering used by the bytes encoding.
    pub fn mode(&self) -> Mode {
        self.opts.mode
    }

    /// Encrypts `msg`, returning the concatenated-bytes encoding.
    pub fn encrypt<R: CryptoRngCore + ?Sized>(&self, rng: &mut R, msg: &[u8]) -> Result<Vec<u8>> {
        let cipher = encrypt(rng, &self.public_key, msg, &self.opts)?;
        Ok(cipher.to_bytes(self.public_key.curve(), self.opts.mode))
    }

    /// Encrypts `msg`, returning the ASN.1 DER encoding.
    pub fn encrypt_der<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = encrypt(rng, &self.public_key, msg, &self.opts)?;
        cipher.to_der()
    }
}

impl From<PublicKey> for EncryptingKey {
    fn from(public_key: PublicKey) -> Self {
        Self {
            public_key,
            opts: EncrypterOpts::default(),
        }
    }
}

/// Core encryption. Redraws the ephemeral scalar while the keystream is
/// all zero, up to [`MAX_RETRY_LIMIT`] attempts; an empty message has an
/// empty keystream and never retries.
pub(crate) fn encrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    public_key: &PublicKey,
    msg: &[u8],
    opts: &EncrypterOpts,
) -> Result<Cipher> {
    let curve = public_key.curve();
    for _ in 0..MAX_RETRY_LIMIT {
        // A1: generate a random number k in [1, n-1]
        let k = curve.rand_scalar(rng)?;

        // A2: C1 = [k]G
        let c1 = curve.mul_base(&k);

        // A4: (x2, y2) = [k]PB; the public point has order n, so this is
        // never the identity for k in [1, n-1]
        let shared = curve.mul_point(public_key.point(), &k);
        let mut x2 = curve.field_bytes(shared.x());
        let mut y2 = curve.field_bytes(shared.y());

        // A5: t = KDF(x2 || y2, klen)
        let mut seed = Vec::with_capacity(x2.len() + y2.len());
        seed.extend_from_slice(&x2);
        seed.extend_from_slice(&y2);
        let mut t = kdf(opts.hash, &seed, msg.len());
        seed.zeroize();

        if !msg.is_empty() && is_all_zero(&t) {
            x2.zeroize();
            y2.zeroize();
            continue;
        }

        // A6: C2 = M xor t
        for (tb, mb) in t.iter_mut().zip(msg) {
            *tb ^= mb;
        }

        // A7: C3 = Hash(x2 || M || y2)
        let mut md = (opts.hash)();
        md.update(&x2);
        md.update(msg);
        md.update(&y2);
        let c3 = md.finalize_reset().into_vec();

        x2.zeroize();
        y2.zeroize();
        return Ok(Cipher::new(c1, t, c3));
    }
    Err(Error::KdfRetryExhausted {
        attempts: MAX_RETRY_LIMIT,
    })
}
