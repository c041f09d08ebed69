//! ASN.1 DER encoding for SM2 signatures.

use der::asn1::UintRef;
use der::{Decode, Encode, Sequence};
use num_bigint::BigUint;

use super::Signature;
use crate::{Error, Result};

/// `SEQUENCE { r INTEGER, s INTEGER }`
#[derive(Sequence)]
struct DerSignature<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

impl Signature {
    /// Parses an ASN.1 DER signature.
    pub fn from_der(data: &[u8]) -> Result<Self> {
        let parsed = DerSignature::from_der(data).map_err(|_| Error::MalformedSignature)?;
        Self::from_scalars(
            BigUint::from_bytes_be(parsed.r.as_bytes()),
            BigUint::from_bytes_be(parsed.s.as_bytes()),
        )
    }

    /// Encodes as an ASN.1 DER `SEQUENCE` of two minimally-encoded
    /// `INTEGER`s.
    pub fn to_der(&self) -> Vec<u8> {
        let r = self.r().to_bytes_be();
        let s = self.s().to_bytes_be();
        let der = DerSignature {
            r: UintRef::new(&r).expect("r is a non-zero scalar"),
            s: UintRef::new(&s).expect("s is a non-zero scalar"),
        };
        der.to_der().expect("two bounded integers always encode")
    }
}
