/// RSA-OAEP payload encryption
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;

use crate::error::EncryptionError;

/// SHA-256 output size in bytes
const HASH_LEN: usize = 32;

/// Build the plaintext bound to the license: `serialKey:hardwareID`
///
/// Neither part is escaped. A colon inside the serial key makes the
/// split on the server ambiguous; callers must not pass one.
pub fn build_plaintext(serial_key: &str, hardware_id: &str) -> String {
    format!("{}:{}", serial_key, hardware_id)
}

/// Largest OAEP/SHA-256 plaintext a key of `modulus_bytes` can carry
pub fn max_plaintext_len(modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(2 * HASH_LEN + 2)
}

/// Parse a PEM public key, SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`)
pub fn parse_public_key(pem: &str) -> Result<RsaPublicKey, EncryptionError> {
    let pem = pem.trim();
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|spki_err| {
            RsaPublicKey::from_pkcs1_pem(pem).map_err(|_| spki_err.to_string())
        })
        .map_err(EncryptionError::InvalidPublicKey)
}

/// Encrypt `serialKey:hardwareID` under the product public key
///
/// Uses RSA-OAEP with SHA-256 for both the digest and MGF1. Output is
/// standard padded base64. OAEP seeds come from the OS RNG, so two calls
/// with identical inputs give different ciphertexts.
pub fn encrypt_payload(
    serial_key: &str,
    hardware_id: &str,
    public_key_pem: &str,
) -> Result<String, EncryptionError> {
    let public_key = parse_public_key(public_key_pem)?;
    let plaintext = build_plaintext(serial_key, hardware_id);

    let max = max_plaintext_len(public_key.size());
    if plaintext.len() > max {
        return Err(EncryptionError::PlaintextTooLong {
            len: plaintext.len(),
            max,
        });
    }

    let ciphertext = public_key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext.as_bytes())?;
    Ok(BASE64.encode(ciphertext))
}
