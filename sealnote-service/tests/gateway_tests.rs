//! Double-layer gateway tests: the server layer and the envelope layer must
//! compose and fail independently.

use sealnote_crypto::{decode_key_b64, NoteKeyPair, ServerSecret};
use sealnote_service::{EncryptionGateway, GatewayError};

#[test]
fn write_then_read_recovers_plaintext() {
    let gateway = EncryptionGateway::new(&ServerSecret::generate());
    let written = gateway.write_layer("the quick brown fox").unwrap();
    let plaintext = gateway
        .read_layer(&written.ciphertext, &written.private_key_b64)
        .unwrap();
    assert_eq!(plaintext, "the quick brown fox");
}

#[test]
fn write_layer_is_nondeterministic() {
    let gateway = EncryptionGateway::new(&ServerSecret::generate());
    let a = gateway.write_layer("same text").unwrap();
    let b = gateway.write_layer("same text").unwrap();
    assert_ne!(a.ciphertext, b.ciphertext);
    assert_ne!(a.private_key_b64, b.private_key_b64);
}

#[test]
fn keys_come_back_as_32_byte_base64() {
    let gateway = EncryptionGateway::new(&ServerSecret::generate());
    let written = gateway.write_layer("text").unwrap();
    assert_eq!(decode_key_b64(&written.private_key_b64).unwrap().len(), 32);
    assert_eq!(decode_key_b64(&written.public_key_b64).unwrap().len(), 32);
}

#[test]
fn wrong_server_secret_fails_with_cipher_error() {
    let gateway = EncryptionGateway::new(&ServerSecret::generate());
    let other_gateway = EncryptionGateway::new(&ServerSecret::generate());

    // The inner layer is perfectly valid; only the server secret differs
    let written = gateway.write_layer("text").unwrap();
    let err = other_gateway
        .read_layer(&written.ciphertext, &written.private_key_b64)
        .unwrap_err();
    assert!(matches!(err, GatewayError::Cipher(_)), "got: {err:?}");
}

#[test]
fn wrong_private_key_fails_with_envelope_error() {
    let gateway = EncryptionGateway::new(&ServerSecret::generate());
    let written = gateway.write_layer("text").unwrap();

    let unrelated = NoteKeyPair::generate();
    let err = gateway
        .read_layer(&written.ciphertext, &unrelated.secret_b64())
        .unwrap_err();
    assert!(matches!(err, GatewayError::Envelope(_)), "got: {err:?}");
}

#[test]
fn malformed_private_key_fails_with_encoding_error() {
    let gateway = EncryptionGateway::new(&ServerSecret::generate());
    let written = gateway.write_layer("text").unwrap();

    let err = gateway
        .read_layer(&written.ciphertext, "@@@not-base64@@@")
        .unwrap_err();
    assert!(matches!(err, GatewayError::KeyEncoding(_)), "got: {err:?}");
}

#[test]
fn shared_pair_covers_both_fields_of_a_write() {
    let gateway = EncryptionGateway::new(&ServerSecret::generate());
    let pair = NoteKeyPair::generate();

    let title_cipher = gateway.write_layer_with("title", &pair).unwrap();
    let content_cipher = gateway.write_layer_with("content", &pair).unwrap();

    assert_eq!(gateway.read_layer(&title_cipher, &pair.secret_b64()).unwrap(), "title");
    assert_eq!(
        gateway.read_layer(&content_cipher, &pair.secret_b64()).unwrap(),
        "content"
    );
}
