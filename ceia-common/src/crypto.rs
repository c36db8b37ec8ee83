//! Symmetric primitives used to obscure a persisted session.
//!
//! The key is derived from a secret that ships with the client configuration,
//! so anyone holding that configuration can decrypt a blob. This keeps casual
//! readers of the storage namespace away from the bearer token; it is not a
//! confidentiality boundary against someone who can read the client itself.

use base64::{engine::general_purpose::STANDARD, Engine};
use crypto_secretbox::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Key, Nonce, XSalsa20Poly1305,
};

/// BLAKE3 `derive_key` context. Changing it invalidates every stored blob.
const KEY_DERIVATION_CONTEXT: &str = "ceia-dashboard 2024-06 session storage key";

/// Length of the random nonce prepended to every ciphertext.
pub const NONCE_LEN: usize = 24;
/// Length of the Poly1305 authentication tag appended by the cipher.
pub const TAG_LEN: usize = 16;

/// 32-byte key for [encrypt] and [decrypt].
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    /// Derive a key from the configured shared secret.
    pub fn derive(secret: &str) -> Self {
        Self(blake3::derive_key(
            KEY_DERIVATION_CONTEXT,
            secret.as_bytes(),
        ))
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Encrypt `plain_text`, returning `nonce || ciphertext || tag`.
pub fn encrypt(plain_text: &[u8], key: &SessionKey) -> Vec<u8> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key.as_bytes()));
    let nonce = XSalsa20Poly1305::generate_nonce(&mut OsRng);

    let cipher_text = cipher
        .encrypt(&nonce, plain_text)
        .expect("XSalsa20Poly1305 encryption of an in-memory buffer");

    let mut out = Vec::with_capacity(NONCE_LEN + cipher_text.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&cipher_text);

    out
}

/// Decrypt the output of [encrypt].
pub fn decrypt(bytes: &[u8], key: &SessionKey) -> Result<Vec<u8>, DecryptError> {
    if bytes.len() < NONCE_LEN + TAG_LEN {
        return Err(DecryptError::TooShort(bytes.len()));
    }

    let (nonce, cipher_text) = bytes.split_at(NONCE_LEN);
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key.as_bytes()));

    cipher
        .decrypt(Nonce::from_slice(nonce), cipher_text)
        .map_err(|_| DecryptError::Fail)
}

/// [encrypt], then encode as standard base64 so the result fits a string store.
pub fn encrypt_to_base64(plain_text: &[u8], key: &SessionKey) -> String {
    STANDARD.encode(encrypt(plain_text, key))
}

/// Decode standard base64, then [decrypt].
pub fn decrypt_base64(encoded: &str, key: &SessionKey) -> Result<Vec<u8>, DecryptError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    decrypt(&bytes, key)
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Error while decrypting a blob.
pub enum DecryptError {
    #[error("Blob is not valid base64: {0}")]
    /// Blob is not valid base64.
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Blob is too short to hold a nonce and a tag: {0} bytes")]
    /// Blob is too short to hold a nonce and a tag.
    TooShort(usize),

    #[error("Failed to decrypt: wrong key or tampered ciphertext")]
    /// Wrong key or tampered ciphertext.
    Fail,
}
