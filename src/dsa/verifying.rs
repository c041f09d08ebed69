//! Support for verifying SM2DSA signatures.
//!
//! ## Algorithm
//!
//! ```text
//! B1: verify whether r' in [1, n-1], failed if not
//! B2: verify whether s' in [1, n-1], failed if not
//! B3: set M'~ = ZA || M'
//! B4: e' = Hv(M'~)
//! B5: t = (r' + s') mod n, failed if t = 0
//! B6: (x1', y1') = [s']G + [t]PA
//! B7: R = (e' + x1') mod n, pass iff R = r'
//! ```

use num_bigint::BigUint;
use num_traits::Zero;
use signature::Verifier;
use signature::hazmat::PrehashVerifier;

use super::{Signature, SignerOpts};
use crate::distid::{hash_msg, hash_z};
use crate::{Error, PublicKey, Result};

/// SM2DSA key used for verifying signatures.
///
/// Carries the public key, the signer options and the identity digest `ZA`
/// computed once at construction.
#[derive(Clone, Debug)]
pub struct VerifyingKey {
    public_key: PublicKey,
    opts: SignerOpts,
    identity_hash: Vec<u8>,
}

impl VerifyingKey {
    /// Creates a verifying key with the default options (default uid,
    /// SM3).
    pub fn new(public_key: &PublicKey) -> Result<Self> {
        Self::new_with_opts(public_key, SignerOpts::default())
    }

    /// Creates a verifying key with explicit signer options.
    ///
    /// Fails with [`Error::UidTooLarge`] when the uid does not fit
    /// `ENTLA`.
    pub fn new_with_opts(public_key: &PublicKey, opts: SignerOpts) -> Result<Self> {
        let identity_hash = hash_z(public_key, opts.uid(), opts.hash)?;
        Ok(Self {
            public_key: public_key.clone(),
            opts,
            identity_hash,
        })
    }

    /// Creates a verifying key from a SEC1-encoded public key, with the
    /// default options.
    pub fn from_sec1_bytes(data: &[u8]) -> Result<Self> {
        Self::new(&PublicKey::from_sec1_bytes(data)?)
    }

    /// Underlying public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Identity digest `ZA` bound into every signature.
    pub fn identity_hash(&self) -> &[u8] {
        &self.identity_hash
    }

    /// `Hv(ZA || msg)`
    pub(crate) fn hash_msg(&self, msg: &[u8]) -> Vec<u8> {
        hash_msg(&self.identity_hash, msg, self.opts.hash)
    }

    /// Boolean convenience wrapper around [`Verifier::verify`]: collapses
    /// every failure to `false`.
    pub fn is_valid(&self, msg: &[u8], signature: &Signature) -> bool {
        verify_digest(&self.public_key, &self.hash_msg(msg), signature).is_ok()
    }
}

/// Verifies a signature over a pre-computed digest, bypassing the `ZA`
/// binding.
pub fn verify_digest(public_key: &PublicKey, digest: &[u8], signature: &Signature) -> Result<()> {
    let curve = public_key.curve();
    let n = curve.n();

    // B1/B2: r, s in [1, n-1]; already enforced when the signature was
    // parsed, rechecked here before any curve math
    let r = signature.r();
    let s = signature.s();
    if r.is_zero() || s.is_zero() || r >= n || s >= n {
        return Err(Error::MalformedSignature);
    }

    // B5: t = (r + s) mod n, failed if t = 0
    let t = (r + s) % n;
    if t.is_zero() {
        return Err(Error::InvalidSignature);
    }

    // B4: e' = Hv(M'~)
    let e = BigUint::from_bytes_be(digest);

    // B6: (x1', y1') = [s']G + [t]PA
    let point = curve.lincomb(s, &t, public_key.point());
    if point.is_identity() {
        return Err(Error::InvalidSignature);
    }

    // B7: R = (e' + x1') mod n, pass iff R = r'
    if (&e + point.x()) % n == *r {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}

//
// `*Verifier` trait impls
//

impl Verifier<Signature> for VerifyingKey {
    fn verify(
        &self,
        msg: &[u8],
        signature: &Signature,
    ) -> core::result::Result<(), signature::Error> {
        verify_digest(&self.public_key, &self.hash_msg(msg), signature)
            .map_err(|_| signature::Error::new())
    }
}

impl PrehashVerifier<Signature> for VerifyingKey {
    fn verify_prehash(
        &self,
        prehash: &[u8],
        signature: &Signature,
    ) -> core::result::Result<(), signature::Error> {
        verify_digest(&self.public_key, prehash, signature).map_err(|_| signature::Error::new())
    }
}

//
// Other trait impls
//

impl AsRef<PublicKey> for VerifyingKey {
    fn as_ref(&self) -> &PublicKey {
        &self.public_key
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(verifying_key: VerifyingKey) -> PublicKey {
        verifying_key.public_key
    }
}

impl From<&VerifyingKey> for PublicKey {
    fn from(verifying_key: &VerifyingKey) -> PublicKey {
        verifying_key.public_key.clone()
    }
}
