//! Pure Rust implementation of the SM2 elliptic curve public key
//! cryptosystem as defined in the Chinese national standard GB/T 32918:
//! digital signatures with per-signer identity binding ([`dsa`]), public
//! key encryption with a KDF-derived stream cipher and integrity tag
//! ([`pke`]), and the two interoperable wire formats (fixed-width bytes
//! and ASN.1 DER).
//!
//! The default hash is SM3; any hash exposing the `digest` interface can
//! be substituted through the options types ([`pke::EncrypterOpts`],
//! [`dsa::SignerOpts`]).
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
//! // Encrypting
//! let encrypting_key = EncryptingKey::new(private_key.public_key());
//! let ciphertext = encrypting_key.encrypt(&mut rng, b"plaintext")?;
//!
//! // Decrypting
//! let decrypting_key = DecryptingKey::new(&private_key);
//! assert_eq!(decrypting_key.decrypt(&ciphertext)?, b"plaintext");
//!
//! // Signing and verifying
//! use gm_sm2::dsa::SigningKey;
//! use gm_sm2::dsa::signature::{RandomizedSigner, Verifier};
//!
//! let signing_key = SigningKey::new(&private_key)?;
//! let signature = signing_key.try_sign_with_rng(&mut rng, b"message")?;
//! signing_key.verifying_key().verify(b"message", &signature)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

pub mod dsa;
pub mod kdf;
pub mod pke;

mod arithmetic;
mod curve;
mod distid;
mod error;
mod private_key;
mod public_key;

pub use crate::{
    curve::{AffinePoint, Curve, sm2_p256},
    distid::hash_z,
    error::{Error, Result},
    private_key::PrivateKey,
    public_key::PublicKey,
};

use sm3::{Digest, Sm3, digest::DynDigest};

/// Constructor for the pluggable hash consumed by the KDF, the `ZA`
/// identity digest and ciphertext tagging.
pub type HashFn = fn() -> Box<dyn DynDigest>;

/// Returns a boxed SM3 instance, the default hash for every SM2 operation.
pub fn sm3_hash() -> Box<dyn DynDigest> {
    Box::new(Sm3::new())
}
