//! Support for SM2DSA signing.
//!
//! ## Algorithm
//!
//! ```text
//! A1: set M~ = ZA || M
//! A2: e = Hv(M~)
//! A3: pick a random number k in [1, n-1]
//! A4: (x1, y1) = [k]G
//! A5: r = (e + x1) mod n, return to A3 if r = 0 or r + k = n
//! A6: s = ((1 + dA)^-1 * (k - r*dA)) mod n, return to A3 if s = 0
//! A7: the signature of M is (r, s)
//! ```

use core::fmt::{self, Debug};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use signature::hazmat::RandomizedPrehashSigner;
use signature::{KeypairRef, RandomizedSigner};
use subtle::{Choice, ConstantTimeEq};

use super::{Signature, SignerOpts, VerifyingKey};
use crate::arithmetic::field;
use crate::{PrivateKey, Result};

/// SM2DSA key used for signing messages.
///
/// Holds the private key together with the [`VerifyingKey`] carrying the
/// precomputed identity digest `ZA` for the configured uid and hash.
#[derive(Clone)]
pub struct SigningKey {
    private_key: PrivateKey,
    verifying_key: VerifyingKey,
}

impl SigningKey {
    /// Creates a signing key with the default options (default uid, SM3).
    pub fn new(private_key: &PrivateKey) -> Result<Self> {
        Self::new_with_opts(private_key, SignerOpts::default())
    }

    /// Creates a signing key with explicit signer options.
    ///
    /// Computes the identity digest once; fails with
    /// [`crate::Error::UidTooLarge`] when the uid does not fit `ENTLA`.
    pub fn new_with_opts(private_key: &PrivateKey, opts: SignerOpts) -> Result<Self> {
        let verifying_key = VerifyingKey::new_with_opts(private_key.public_key(), opts)?;
        Ok(Self {
            private_key: private_key.clone(),
            verifying_key,
        })
    }

    /// Parses a signing key from a big-endian secret scalar, with the
    /// default options.
    pub fn from_slice(d: &[u8]) -> Result<Self> {
        Self::new(&PrivateKey::from_slice(d)?)
    }

    /// Underlying private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The [`VerifyingKey`] which corresponds to this key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Signs `msg`, drawing ephemeral scalars from `rng`.
    pub fn sign<R: CryptoRngCore + ?Sized>(&self, rng: &mut R, msg: &[u8]) -> Result<Signature> {
        // A1/A2: e = Hv(ZA || M)
        let e = self.verifying_key.hash_msg(msg);
        sign_digest(rng, &self.private_key, &e)
    }
}

/// Signs a pre-computed digest, bypassing the `ZA` binding.
///
/// Interoperates with pipelines that hash externally; prefer
/// [`SigningKey::sign`] everywhere else.
pub fn sign_digest<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    private_key: &PrivateKey,
    digest: &[u8],
) -> Result<Signature> {
    let curve = private_key.curve();
    let n = curve.n();
    let d = private_key.d();
    let e = BigUint::from_bytes_be(digest);

    loop {
        let (k, r) = loop {
            // A3: pick a random number k in [1, n-1]
            let k = curve.rand_scalar(rng)?;

            // A4: (x1, y1) = [k]G
            let x1 = curve.mul_base(&k);

            // A5: r = (e + x1) mod n, redraw if r = 0 or r + k = n
            let r = (&e + x1.x()) % n;
            if !r.is_zero() && &r + &k != *n {
                break (k, r);
            }
        };

        // A6: s = ((1 + dA)^-1 * (k - r*dA)) mod n, redraw if s = 0
        let rd = field::mul(&r, d, n);
        let k_minus_rd = field::sub(&k, &rd, n);
        let d1_inv = field::inv(&field::add(d, &BigUint::one(), n), n);
        let s = field::mul(&k_minus_rd, &d1_inv, n);

        if !s.is_zero() {
            // A7: the signature of M is (r, s)
            return Signature::from_scalars(r, s);
        }
    }
}

//
// `*Signer` trait impls
//

impl RandomizedSigner<Signature> for SigningKey {
    fn try_sign_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        msg: &[u8],
    ) -> core::result::Result<Signature, signature::Error> {
        self.sign(rng, msg).map_err(|_| signature::Error::new())
    }
}

impl RandomizedPrehashSigner<Signature> for SigningKey {
    fn sign_prehash_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        prehash: &[u8],
    ) -> core::result::Result<Signature, signature::Error> {
        sign_digest(rng, &self.private_key, prehash).map_err(|_| signature::Error::new())
    }
}

//
// Other trait impls
//

impl AsRef<VerifyingKey> for SigningKey {
    fn as_ref(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl ConstantTimeEq for SigningKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.private_key.ct_eq(&other.private_key)
    }
}

/// Constant-time comparison
impl Eq for SigningKey {}
impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

impl KeypairRef for SigningKey {
    type VerifyingKey = VerifyingKey;
}
