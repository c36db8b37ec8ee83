//! High-level façade for the CEIA client.
//!
//! ## Mental model
//! - `Ceia` - your entrypoint/handle to the SDK. Owns an [`ApiClient`], which
//!   in turn owns the transport and the [`SessionStore`].
//! - `RouteGuard` - decides what a navigation leads to for the current session.
//! - `ResourceClient` / `ImageClient` - authenticated CRUD over the REST API.
//!
//! Every actor handed out by `Ceia` shares the same session store, so a login
//! or logout through the façade is seen by all of them on their next call.
//!
//! ```no_run
//! use std::sync::Arc;
//! use ceia_sdk::{ApiResource, Ceia, CeiaHttpClient, FileStore};
//!
//! # async fn run() -> ceia_sdk::Result<()> {
//! let client = CeiaHttpClient::new("https://api.example.org/")?;
//! let storage = Arc::new(FileStore::new("/tmp/ceia-session.json"));
//! let ceia = Ceia::new(client, storage, "shared secret");
//!
//! if ceia.session().is_some() {
//!     let equipos: Vec<serde_json::Value> = ceia.resource(ApiResource::Equipos).list().await?;
//!     println!("{} equipos", equipos.len());
//! }
//! # Ok(()) }
//! ```

use std::sync::Arc;

use ceia_common::{permissions::RouteTable, session::Session};

use crate::{
    ApiClient, ApiResource, CeiaHttpClient, ImageClient, KeyValueStore, ResourceClient,
    RouteGuard, SessionStore,
};

/// High-level façade. Owns the authenticated pipeline and constructs the actors.
#[derive(Clone, Debug)]
pub struct Ceia {
    pub(crate) api: ApiClient,
}

impl Ceia {
    /// Construct over `storage`, encrypting the session with a key derived from `secret`.
    pub fn new(client: CeiaHttpClient, storage: Arc<dyn KeyValueStore>, secret: &str) -> Self {
        Self::with_session_store(client, SessionStore::new(storage, secret))
    }

    /// Construct from an already-configured session store.
    pub fn with_session_store(client: CeiaHttpClient, sessions: SessionStore) -> Self {
        Self {
            api: ApiClient::new(client, sessions),
        }
    }

    // === Getters ===

    /// The current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.api.sessions().load()
    }

    /// The shared session store.
    pub fn sessions(&self) -> &SessionStore {
        self.api.sessions()
    }

    /// The authenticated request pipeline (advanced use).
    #[inline]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Access the underlying transport (advanced use).
    #[inline]
    pub fn client(&self) -> &CeiaHttpClient {
        self.api.client()
    }

    // === Actors ===

    /// Route guard over the canonical route table.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.sessions().clone())
    }

    /// Route guard over a custom route table.
    pub fn guard_with(&self, table: RouteTable) -> RouteGuard {
        RouteGuard::with_table(self.sessions().clone(), table)
    }

    /// CRUD handle for one REST collection.
    pub fn resource(&self, kind: ApiResource) -> ResourceClient {
        ResourceClient::new(self.api.clone(), kind)
    }

    /// Image attachments of equipment and requests.
    pub fn images(&self) -> ImageClient {
        ImageClient::new(self.api.clone())
    }
}

#[cfg(test)]
mod tests {
    use ceia_common::permissions::labels::GESTION_EQUIPOS;

    use super::*;
    use crate::{MemoryStore, Navigation};

    #[test]
    fn actors_share_the_session_store() {
        let ceia = Ceia::new(
            CeiaHttpClient::new("https://api.example.org/").unwrap(),
            Arc::new(MemoryStore::new()),
            "secret",
        );
        let guard = ceia.guard();
        assert!(!guard.evaluate("/equipos").is_authorized());

        let session = Session::new("abc123", 1, "Ana", vec![GESTION_EQUIPOS.into()]).unwrap();
        ceia.sessions().save(&session).unwrap();

        assert_eq!(ceia.session(), Some(session));
        assert!(matches!(
            guard.evaluate("/equipos"),
            Navigation::Render { .. }
        ));
        assert_eq!(ceia.api().sessions().token().as_deref(), Some("abc123"));
    }
}
