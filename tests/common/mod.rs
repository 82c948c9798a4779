//! Shared helpers for integration tests.

#![allow(dead_code)]

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::rand_core::OsRng;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;

pub const API_KEY: &str = "k1";
pub const SERIAL_KEY: &str = "A2UV9-9HZYZ-UWFK8-SS71A";
pub const HARDWARE_ID: &str = "linux_x64_aa:bb:cc:dd:ee:ff";

/// Product keypair: private half for the stub server, PEM public half for the client.
pub fn keypair() -> (RsaPrivateKey, String) {
    let private_key = RsaPrivateKey::new(&mut OsRng, 1024).expect("key generation");
    let pem = private_key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("PEM encoding");
    (private_key, pem)
}

/// What the licensing server does with a payload.
pub fn decrypt_payload(private_key: &RsaPrivateKey, payload: &str) -> String {
    let ciphertext = BASE64.decode(payload).expect("base64 payload");
    let plaintext = private_key
        .decrypt(Oaep::new::<Sha256>(), &ciphertext)
        .expect("OAEP decryption");
    String::from_utf8(plaintext).expect("UTF-8 plaintext")
}

/// A local address with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
