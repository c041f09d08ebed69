//! SM2DSA tests.

use gm_sm2::dsa::signature::{RandomizedSigner, Verifier};
use gm_sm2::dsa::{Signature, SignerOpts, SigningKey, VerifyingKey};
use gm_sm2::{Error, PrivateKey, PublicKey, sm3_hash};
use hex_literal::hex;
use proptest::prelude::*;
use rand::rngs::OsRng;

const PUBLIC_KEY: [u8; 65] = hex!(
    "0408D77AE04C01CC4C1104360DD8AF6B6F7DF334283D7C1A6AFD5652407B87BEE5014E2A57C36C150D16324DC664E31E6432359609C4E79847A5B161C8C7364C8A"
);
const IDENTITY: &[u8] = b"example@rustcrypto.org";
const MSG: &[u8] = b"testing";

// Created using:
// $ openssl pkeyutl -sign -in - -inkey pkcs8-private-key.pem -out sig -digest sm3 -pkeyopt distid:example@rustcrypto.org
const SIG: [u8; 64] = hex!(
    "d1dcccedd9fb785e0f67c16b7c52901625c0b69de9bca2144acc7be713cad2fc" // r
    "f7d1eae6e3a157b36c65f672f738ca8b46298bf149a6510072c431b49cd88b1c" // s
);

const SIG_DER: [u8; 71] = hex!(
    "304502201d09df0f021b8c9aa7a437c713f11f9bc5ef49b5f053de912d6a3a8b68d49688022100c8acda282cb69bd4734b9c164925772f8f5cb23b273c222d69a4a49bb40a8701"
);

fn identity_opts() -> SignerOpts {
    SignerOpts {
        uid: Some(IDENTITY.to_vec()),
        hash: sm3_hash,
    }
}

#[test]
fn verify_test_vector() {
    let public_key = PublicKey::from_sec1_bytes(&PUBLIC_KEY).unwrap();
    let vk = VerifyingKey::new_with_opts(&public_key, identity_opts()).unwrap();
    let sig = Signature::from_bytes(&SIG).expect("decoded Signature failed");
    assert!(vk.verify(MSG, &sig).is_ok());
}

#[test]
fn test_vector_rejects_other_uids() {
    let public_key = PublicKey::from_sec1_bytes(&PUBLIC_KEY).unwrap();
    let vk = VerifyingKey::new(&public_key).unwrap();
    let sig = Signature::from_bytes(&SIG).unwrap();
    assert!(vk.verify(MSG, &sig).is_err());
}

#[test]
fn test_signature_der_encoding() {
    let sig = Signature::from_der(&SIG_DER).expect("decoded Signature failed");
    assert_eq!(sig.r_bytes(), &SIG_DER[4..36]);
    assert_eq!(sig.s_bytes(), &SIG_DER[39..71]);
    assert_eq!(sig.to_der(), &SIG_DER[..]);
}

#[test]
fn rejects_out_of_range_components() {
    // r = 0, s = 1
    let mut bytes = [0u8; 64];
    bytes[63] = 1;
    assert_eq!(
        Signature::from_bytes(&bytes).unwrap_err(),
        Error::MalformedSignature
    );

    // r = n, s = 1
    bytes[..32].copy_from_slice(&hex!(
        "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123"
    ));
    assert_eq!(
        Signature::from_bytes(&bytes).unwrap_err(),
        Error::MalformedSignature
    );

    // wrong length
    assert_eq!(
        Signature::from_slice(&[1u8; 63]).unwrap_err(),
        Error::MalformedSignature
    );
}

#[test]
fn uid_boundary() {
    let private_key = PrivateKey::generate(&mut OsRng).unwrap();
    let opts = |len: usize| SignerOpts {
        uid: Some(vec![0x41; len]),
        hash: sm3_hash,
    };

    assert!(VerifyingKey::new_with_opts(private_key.public_key(), opts(8191)).is_ok());
    assert_eq!(
        VerifyingKey::new_with_opts(private_key.public_key(), opts(8192)).unwrap_err(),
        Error::UidTooLarge
    );
    assert_eq!(
        SigningKey::new_with_opts(&private_key, opts(8192)).unwrap_err(),
        Error::UidTooLarge
    );
}

#[test]
fn identity_hash_is_deterministic() {
    let private_key = PrivateKey::generate(&mut OsRng).unwrap();
    let a = gm_sm2::hash_z(private_key.public_key(), IDENTITY, sm3_hash).unwrap();
    let b = gm_sm2::hash_z(private_key.public_key(), IDENTITY, sm3_hash).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);

    let other = gm_sm2::hash_z(private_key.public_key(), b"other", sm3_hash).unwrap();
    assert_ne!(a, other);
}

#[test]
fn worked_example() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(42);

    let private_key = PrivateKey::generate(&mut rng).unwrap();
    let signing_key = SigningKey::new(&private_key).unwrap();
    let signature = signing_key.sign(&mut rng, b"test").unwrap();
    assert!(signing_key.verifying_key().is_valid(b"test", &signature));

    let other_key = PrivateKey::generate(&mut rng).unwrap();
    let other_vk = VerifyingKey::new(other_key.public_key()).unwrap();
    assert!(!other_vk.is_valid(b"test", &signature));
}

#[test]
fn prehash_round_trip() {
    use gm_sm2::dsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};

    let signing_key = SigningKey::from_slice(&[0x42; 32]).unwrap();
    let digest = [0x24u8; 32];
    let signature = signing_key
        .sign_prehash_with_rng(&mut OsRng, &digest)
        .unwrap();
    assert!(
        signing_key
            .verifying_key()
            .verify_prehash(&digest, &signature)
            .is_ok()
    );
    assert!(
        signing_key
            .verifying_key()
            .verify_prehash(&[0u8; 32], &signature)
            .is_err()
    );
}

fn signing_key_from(bytes: [u8; 32]) -> SigningKey {
    SigningKey::from_slice(&bytes)
        .unwrap_or_else(|_| SigningKey::from_slice(&[0x01; 32]).unwrap())
}

prop_compose! {
    fn signing_key()(bytes in any::<[u8; 32]>()) -> SigningKey {
        signing_key_from(bytes)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn sign_and_verify(sk in signing_key()) {
        let signature = sk.try_sign_with_rng(&mut OsRng, MSG).unwrap();
        prop_assert!(sk.verifying_key().verify(MSG, &signature).is_ok());
    }

    #[test]
    fn sign_and_verify_der(sk in signing_key()) {
        let signature = sk.try_sign_with_rng(&mut OsRng, MSG).unwrap();
        let signature_der = signature.to_der();
        let decoded = Signature::from_der(&signature_der).expect("decoded Signature failed");
        prop_assert!(sk.verifying_key().verify(MSG, &decoded).is_ok());
    }

    #[test]
    fn reject_tampered_signature(sk in signing_key(), byte in 0usize..64, bit in 0usize..8) {
        let mut signature_bytes = sk.try_sign_with_rng(&mut OsRng, MSG).unwrap().to_bytes();

        // tweak signature to make it invalid
        signature_bytes[byte] ^= 1 << bit;

        match Signature::from_bytes(&signature_bytes) {
            Ok(signature) => prop_assert!(!sk.verifying_key().is_valid(MSG, &signature)),
            Err(err) => prop_assert_eq!(err, Error::MalformedSignature),
        }
    }

    #[test]
    fn reject_tampered_message(sk in signing_key(), byte in 0usize..MSG.len(), bit in 0usize..8) {
        let signature = sk.try_sign_with_rng(&mut OsRng, MSG).unwrap();
        let mut msg = MSG.to_vec();
        msg[byte] ^= 1 << bit;
        prop_assert!(!sk.verifying_key().is_valid(&msg, &signature));
    }
}
