//! Error types.

use core::fmt;

/// Result type for SM2 operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by key handling, encryption, decryption, signing and
/// verification.
///
/// Decryption and verification failures are deliberately coarse: callers
/// are never told whether a tag mismatched, a keystream was degenerate or
/// a comparison failed, only that the operation did not succeed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Private scalar is zero or does not lie below `n - 1`.
    InvalidPrivateKey,

    /// Public key bytes do not decode to a point on the curve.
    InvalidPublicKey,

    /// Ciphertext is structurally invalid for the requested mode and
    /// encoding.
    MalformedCiphertext,

    /// Signature is structurally invalid: wrong length, bad DER, or an
    /// `r`/`s` component outside `[1, n - 1]`.
    MalformedSignature,

    /// Decryption failed.
    DecryptionFailed,

    /// Signature did not verify against the message and public key.
    InvalidSignature,

    /// Key derivation produced an all-zero keystream on every attempt.
    KdfRetryExhausted {
        /// Number of ephemeral scalars tried before giving up.
        attempts: u32,
    },

    /// Signer identity does not fit the 2-byte `ENTLA` length field
    /// (8192 bytes or more).
    UidTooLarge,

    /// The injected randomness source failed.
    RandomSource,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPrivateKey => f.write_str("invalid private key"),
            Error::InvalidPublicKey => f.write_str("invalid public key"),
            Error::MalformedCiphertext => f.write_str("malformed ciphertext"),
            Error::MalformedSignature => f.write_str("malformed signature"),
            Error::DecryptionFailed => f.write_str("failed to decrypt"),
            Error::InvalidSignature => f.write_str("signature verification failure"),
            Error::KdfRetryExhausted { attempts } => {
                write!(f, "all-zero keystream after {attempts} attempts")
            }
            Error::UidTooLarge => f.write_str("uid too large"),
            Error::RandomSource => f.write_str("randomness source failure"),
        }
    }
}

impl std::error::Error for Error {}
