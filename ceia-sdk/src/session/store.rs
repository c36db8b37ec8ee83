use std::sync::Arc;

use ceia_common::{constants::SESSION_STORAGE_KEY, session::Session};

use super::codec::SessionCodec;
use crate::{KeyValueStore, cross_log, errors::Result};

/// The single point of truth for the persisted [`Session`].
///
/// Wraps a [`KeyValueStore`] namespace and a [`SessionCodec`]. Every consumer
/// that needs the session (route guard, request pipeline, profile calls) goes
/// through one shared `SessionStore` instead of reading storage directly.
///
/// Reads are synchronous and uncached: each [`SessionStore::load`] sees the
/// last completed [`SessionStore::save`] through this namespace. Changes made
/// to the backing store by another process show up on the next read, never
/// earlier.
///
/// Cheap to clone; clones share the namespace.
#[derive(Clone, Debug)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    codec: SessionCodec,
}

impl SessionStore {
    /// Session store over `storage`, keyed by the configured shared secret.
    pub fn new(storage: Arc<dyn KeyValueStore>, secret: &str) -> Self {
        Self::with_codec(storage, SessionCodec::new(secret))
    }

    /// Session store with an explicit codec.
    pub fn with_codec(storage: Arc<dyn KeyValueStore>, codec: SessionCodec) -> Self {
        Self { storage, codec }
    }

    /// The underlying namespace.
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    /// The current session, if any.
    ///
    /// Absent, corrupted and foreign blobs all read as `None`, and so does a
    /// store that cannot be read.
    pub fn load(&self) -> Option<Session> {
        let raw = match self.storage.get(SESSION_STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                cross_log!(warn, "Failed to read the session entry: {e}");
                return None;
            }
        };

        self.codec.decode(&raw)
    }

    /// Encode and persist `session`, replacing any previous one.
    pub fn save(&self, session: &Session) -> Result<()> {
        let blob = self.codec.encode(session);
        self.storage.set(SESSION_STORAGE_KEY, blob.as_str())?;

        Ok(())
    }

    /// Wipe the **whole** namespace, not only the session entry.
    pub fn clear(&self) -> Result<()> {
        self.storage.clear()?;

        Ok(())
    }

    /// Permission labels of the current session; empty when signed out.
    pub fn permissions(&self) -> Vec<String> {
        self.load()
            .map(|session| session.permissions().to_vec())
            .unwrap_or_default()
    }

    /// Bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.load().map(|session| session.token().to_string())
    }

    /// Apply `f` to the persisted session and write it back.
    ///
    /// Returns `Ok(false)` without writing when there is no session.
    pub fn update(&self, f: impl FnOnce(&mut Session)) -> Result<bool> {
        let Some(mut session) = self.load() else {
            return Ok(false);
        };

        f(&mut session);
        self.save(&session)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use ceia_common::permissions::labels::*;

    use super::*;
    use crate::MemoryStore;

    fn store() -> (Arc<MemoryStore>, SessionStore) {
        let storage = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(storage.clone(), "secret");
        (storage, sessions)
    }

    fn session() -> Session {
        Session::new("abc123", 7, "Ana", vec![GESTION_USUARIOS.to_string()]).unwrap()
    }

    #[test]
    fn load_absent() {
        let (_, sessions) = store();

        assert_eq!(sessions.load(), None);
        assert!(sessions.permissions().is_empty());
        assert_eq!(sessions.token(), None);
    }

    #[test]
    fn save_then_load() {
        let (storage, sessions) = store();

        sessions.save(&session()).unwrap();

        assert_eq!(sessions.load(), Some(session()));
        assert_eq!(sessions.token().as_deref(), Some("abc123"));
        assert_eq!(sessions.permissions(), [GESTION_USUARIOS]);
        assert_eq!(storage.keys(), [SESSION_STORAGE_KEY]);
    }

    #[test]
    fn save_overwrites() {
        let (_, sessions) = store();
        let other = Session::new("zzz", 8, "Luis", vec![]).unwrap();

        sessions.save(&session()).unwrap();
        sessions.save(&other).unwrap();

        assert_eq!(sessions.load(), Some(other));
    }

    #[test]
    fn corrupted_blob_reads_as_absent() {
        let (storage, sessions) = store();

        storage.set(SESSION_STORAGE_KEY, "garbage").unwrap();

        assert_eq!(sessions.load(), None);
    }

    #[test]
    fn clear_purges_the_namespace() {
        let (storage, sessions) = store();

        sessions.save(&session()).unwrap();
        storage.set("theme", "dark").unwrap();

        sessions.clear().unwrap();

        assert_eq!(sessions.load(), None);
        assert_eq!(storage.get("theme").unwrap(), None);
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let (_, sessions) = store();
        let clone = sessions.clone();

        clone.save(&session()).unwrap();

        assert_eq!(sessions.load(), Some(session()));
    }

    #[test]
    fn update() {
        let (_, sessions) = store();

        assert!(!sessions.update(|s| {
            s.set_display_name("nobody");
        })
        .unwrap());

        sessions.save(&session()).unwrap();
        assert!(sessions
            .update(|s| {
                s.set_display_name("Ana María");
            })
            .unwrap());

        assert_eq!(sessions.load().unwrap().display_name(), "Ana María");
    }
}
