use reqwest::{Method, RequestBuilder};

use super::core::CeiaHttpClient;
use crate::{SessionStore, errors::Result};

/// Authenticated request pipeline.
///
/// Every request built here is decorated right before it is handed back:
/// the session is loaded (and decrypted) through the [`SessionStore`], and
/// when one exists the request carries `Authorization: Bearer <token>`.
/// Without a session the request goes out unmodified and the backend decides
/// how to reject it.
///
/// The pipeline performs no I/O of its own and never retries; sending the
/// returned [`RequestBuilder`] is the caller's job.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: CeiaHttpClient,
    sessions: SessionStore,
}

impl ApiClient {
    /// Pipeline over `client`, reading credentials from `sessions`.
    pub fn new(client: CeiaHttpClient, sessions: SessionStore) -> Self {
        Self { client, sessions }
    }

    /// Raw transport handle. No credential injection.
    pub fn client(&self) -> &CeiaHttpClient {
        &self.client
    }

    /// The session store credentials are read from.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Build a request to `path` carrying the current session's bearer credential.
    ///
    /// URL resolution failures are returned unchanged.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let request = self.client.request(method, path)?;

        Ok(self.authorize(request))
    }

    /// Attach the current session's bearer credential to an arbitrary request.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.sessions.load() {
            Some(session) => request.bearer_auth(session.token()),
            None => request,
        }
    }
}
