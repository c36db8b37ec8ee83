use std::fmt::Display;

use ceia_common::{
    crypto::{SessionKey, decrypt_base64, encrypt_to_base64},
    session::Session,
};

use crate::cross_log;

/// Opaque, persisted form of a [`Session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBlob(String);

impl EncryptedBlob {
    /// Wrap a string read back from storage.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The string to persist.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the string to persist.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for EncryptedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reversible transformation between a [`Session`] and an [`EncryptedBlob`].
///
/// The key comes from a secret configured at startup and shared by every
/// client build, so this hides the token from casual inspection of storage
/// only. Treat it as obfuscation, not as a security boundary.
#[derive(Clone, Debug)]
pub struct SessionCodec {
    key: SessionKey,
}

impl SessionCodec {
    /// Codec keyed by the configured shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            key: SessionKey::derive(secret),
        }
    }

    /// Codec over an already derived key.
    pub fn with_key(key: SessionKey) -> Self {
        Self { key }
    }

    /// Serialize then encrypt. Infallible for any valid session.
    pub fn encode(&self, session: &Session) -> EncryptedBlob {
        EncryptedBlob(encrypt_to_base64(&session.serialize(), &self.key))
    }

    /// Decrypt then parse.
    ///
    /// Returns `None` for anything that is not a blob produced by this key:
    /// bad encoding, wrong key, tampering, malformed JSON or an empty token.
    pub fn decode(&self, blob: &str) -> Option<Session> {
        let plain = match decrypt_base64(blob, &self.key) {
            Ok(plain) => plain,
            Err(e) => {
                cross_log!(debug, "Discarding undecryptable session blob: {e}");
                return None;
            }
        };

        match Session::deserialize(&plain) {
            Ok(session) => Some(session),
            Err(e) => {
                cross_log!(debug, "Discarding unparsable session payload: {e}");
                None
            }
        }
    }
}
