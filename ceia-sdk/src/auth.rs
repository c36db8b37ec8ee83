//! Sign-in and sign-out.

use std::fmt::Debug;

use ceia_common::{
    constants::endpoints,
    session::{LoginResponse, Session},
};
use reqwest::Method;
use serde::Serialize;

use crate::{
    Ceia, cross_log,
    errors::{AuthError, Result},
    util::{check_http_status, decode_json},
};

/// Login form as the backend expects it.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "Correo")]
    correo: String,
    #[serde(rename = "Clave")]
    clave: String,
}

impl Credentials {
    /// E-mail and password.
    pub fn new(correo: impl Into<String>, clave: impl Into<String>) -> Self {
        Self {
            correo: correo.into(),
            clave: clave.into(),
        }
    }

    /// The e-mail the user signs in with.
    pub fn correo(&self) -> &str {
        &self.correo
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("correo", &self.correo)
            .field("clave", &"..")
            .finish()
    }
}

impl Ceia {
    /// Sign in and persist the resulting session.
    ///
    /// On success the whole storage namespace is wiped before the new session
    /// is written, so nothing from a previous user survives. On failure the
    /// store is left untouched and the server's message is available through
    /// [`crate::Error::server_message`].
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        if credentials.correo.trim().is_empty() || credentials.clave.is_empty() {
            return Err(AuthError::Validation("e-mail and password are required".into()).into());
        }

        cross_log!(info, "Signing in as {}", credentials.correo);
        let response = self
            .client()
            .request(Method::POST, endpoints::LOGIN)?
            .json(credentials)
            .send()
            .await?;
        let response = check_http_status(response).await?;

        let body: LoginResponse = decode_json(response).await?;
        let session = Session::try_from(body)?;

        let sessions = self.sessions();
        sessions.clear()?;
        sessions.save(&session)?;

        cross_log!(info, "Signed in as user {}", session.user_id());
        Ok(session)
    }

    /// Sign out.
    ///
    /// Notifies the backend with the current bearer credential, then wipes
    /// the storage namespace. A failed notification is logged and does not
    /// stop the local sign-out; only a failure to clear the store is
    /// returned. Without a session the backend is not contacted.
    pub async fn logout(&self) -> Result<()> {
        if self.session().is_some() {
            if let Err(e) = self.notify_logout().await {
                cross_log!(warn, "Logout request failed, clearing locally anyway: {e}");
            }
        } else {
            cross_log!(debug, "Logout without a session; skipping the remote call");
        }

        self.sessions().clear()?;
        cross_log!(info, "Signed out");

        Ok(())
    }

    async fn notify_logout(&self) -> Result<()> {
        let response = self
            .api()
            .request(Method::POST, endpoints::LOGOUT)?
            .send()
            .await?;
        check_http_status(response).await?;

        Ok(())
    }
}
