//! Extended SM2 encryption coverage: plaintext shapes, ciphertext layout,
//! cross-key behavior.

use gm_sm2::pke::{Cipher, DecryptingKey, EncrypterOpts, Mode};
use gm_sm2::{PrivateKey, sm2_p256, sm3_hash};
use rand::rngs::OsRng;

/// Fixed key for deterministic test setup.
fn create_test_key() -> DecryptingKey {
    DecryptingKey::from_slice(&[42u8; 32]).unwrap()
}

#[test]
fn test_varying_plaintext_lengths() {
    let dk = create_test_key();
    let ek = dk.encrypting_key();
    let test_plaintexts = vec![
        vec![],         // Empty message
        vec![1u8; 1],   // 1 byte
        vec![2u8; 32],  // 32 bytes
        vec![3u8; 256], // 256 bytes
    ];

    for plaintext in test_plaintexts {
        let ciphertext = ek.encrypt(&mut OsRng, &plaintext).unwrap();
        let decrypted = dk.decrypt(&ciphertext).unwrap();
        assert_eq!(plaintext, decrypted);
    }
}

#[test]
fn test_special_plaintexts() {
    let dk = create_test_key();
    let ek = dk.encrypting_key();
    let special_plaintexts = vec![
        vec![0u8; 32],                // All zeros
        vec![255u8; 32],              // All ones
        b"\n\r\t".to_vec(),           // Control chars
        vec![0xF0, 0x9F, 0x98, 0x81], // UTF-8 emoji
    ];

    for plaintext in special_plaintexts {
        let ciphertext = ek.encrypt(&mut OsRng, &plaintext).unwrap();
        assert_eq!(dk.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn test_ciphertexts_are_randomized() {
    let dk = create_test_key();
    let ek = dk.encrypting_key();
    let a = ek.encrypt(&mut OsRng, b"same message").unwrap();
    let b = ek.encrypt(&mut OsRng, b"same message").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_ciphertext_component_layout() {
    let curve = sm2_p256();
    let dk = create_test_key();
    let msg = b"layout probe";

    for mode in [Mode::C1C3C2, Mode::C1C2C3] {
        let ek = DecryptingKey::new_with_opts(
            dk.private_key(),
            EncrypterOpts {
                mode,
                hash: sm3_hash,
            },
        )
        .encrypting_key();

        let encoded = ek.encrypt(&mut OsRng, msg).unwrap();
        let parsed = Cipher::from_bytes(curve, &encoded, mode, 32).unwrap();
        assert_eq!(parsed.c2().len(), msg.len());
        assert_eq!(parsed.c3().len(), 32);
        assert!(curve.contains(parsed.c1()));
        assert_eq!(parsed.to_bytes(curve, mode), encoded);
    }
}

#[test]
fn test_der_and_bytes_carry_the_same_components() {
    let curve = sm2_p256();
    let dk = create_test_key();
    let ek = dk.encrypting_key();

    let der = ek.encrypt_der(&mut OsRng, b"interop").unwrap();
    let parsed = Cipher::from_der(curve, &der).unwrap();
    let reencoded = parsed.to_bytes(curve, Mode::C1C3C2);
    assert_eq!(dk.decrypt(&reencoded).unwrap(), b"interop");
}

#[test]
fn test_decrypt_rejects_foreign_ciphertext() {
    let dk = create_test_key();
    let foreign = DecryptingKey::new(&PrivateKey::generate(&mut OsRng).unwrap());
    let ciphertext = foreign
        .encrypting_key()
        .encrypt(&mut OsRng, b"not for you")
        .unwrap();
    assert!(dk.decrypt(&ciphertext).is_err());
}
