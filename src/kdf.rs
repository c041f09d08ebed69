//! Key derivation.
//!
//! The keystream is the concatenation of `H(z || ct)` blocks for a 32-bit
//! big-endian counter `ct` starting at 1, truncated to the requested
//! length (GB/T 32918.3 § 5.4.3).

use sm3::digest::DynDigest;

use crate::HashFn;

/// Derives `len` keystream bytes from the shared secret `z`.
pub fn kdf(hash: HashFn, z: &[u8], len: usize) -> Vec<u8> {
    let mut md = hash();
    let block_len = md.output_size();
    let mut out = Vec::with_capacity(len);
    let mut counter: u32 = 1;
    while out.len() < len {
        md.update(z);
        md.update(&counter.to_be_bytes());
        let block = md.finalize_reset();
        let take = usize::min(block_len, len - out.len());
        out.extend_from_slice(&block[..take]);
        counter = counter.wrapping_add(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::kdf;
    use crate::sm3_hash;

    #[test]
    fn keystream_lengths() {
        assert!(kdf(sm3_hash, b"seed", 0).is_empty());
        for len in [1, 31, 32, 33, 64, 100] {
            assert_eq!(kdf(sm3_hash, b"seed", len).len(), len);
        }
    }

    #[test]
    fn longer_keystreams_extend_shorter_ones() {
        let short = kdf(sm3_hash, b"seed", 32);
        let long = kdf(sm3_hash, b"seed", 80);
        assert_eq!(&long[..32], &short[..]);
    }

    #[test]
    fn keystream_depends_on_seed() {
        assert_ne!(kdf(sm3_hash, b"seed", 32), kdf(sm3_hash, b"sead", 32));
    }
}
