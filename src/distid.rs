//! Signer identity binding.
//!
//! ```text
//! ZA = H(ENTLA || uid || a || b || xG || yG || xA || yA)
//! ```
//!
//! `ZA` ties a signature to both the signer's public key and a
//! distinguishing identifier, which defeats duplicate-key substitution:
//! an attacker who registers the same public key under a different
//! identity produces different message digests.

use sm3::digest::DynDigest;

use crate::{Error, HashFn, PublicKey, Result};

/// Computes the identity digest `ZA` for a public key and uid.
///
/// `ENTLA` is the bit length of `uid` as a big-endian `u16`; identities of
/// 8192 bytes or more do not fit and are rejected with
/// [`Error::UidTooLarge`]. An empty uid is permitted (`ENTLA = 0`).
pub fn hash_z(public_key: &PublicKey, uid: &[u8], hash: HashFn) -> Result<Vec<u8>> {
    if uid.len() >= 8192 {
        return Err(Error::UidTooLarge);
    }
    let entla = (uid.len() as u16) * 8;
    let curve = public_key.curve();
    let generator = curve.generator();

    let mut md = hash();
    md.update(&entla.to_be_bytes());
    md.update(uid);
    md.update(&curve.field_bytes(curve.a()));
    md.update(&curve.field_bytes(curve.b()));
    md.update(&curve.field_bytes(generator.x()));
    md.update(&curve.field_bytes(generator.y()));
    md.update(&curve.field_bytes(public_key.point().x()));
    md.update(&curve.field_bytes(public_key.point().y()));
    Ok(md.finalize_reset().into_vec())
}

/// `H(ZA || msg)`, the digest that is actually signed.
pub(crate) fn hash_msg(za: &[u8], msg: &[u8], hash: HashFn) -> Vec<u8> {
    let mut md = hash();
    md.update(za);
    md.update(msg);
    md.finalize_reset().into_vec()
}
