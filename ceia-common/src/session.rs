//! The signed-in user's session.

use serde::{Deserialize, Deserializer, Serialize};

use crate::permissions::is_authorized;

#[derive(Clone, Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawSession")]
/// Client-side record of an authenticated user.
///
/// The canonical form is JSON with the backend's field names, so a blob
/// persisted by one client can be read by another.
pub struct Session {
    token: String,
    #[serde(rename = "IdUsuario")]
    user_id: i64,
    #[serde(rename = "Nombre")]
    display_name: String,
    #[serde(rename = "TipoPermiso")]
    permissions: Vec<String>,
}

impl Session {
    /// Create a new session. The token must not be empty.
    pub fn new(
        token: impl Into<String>,
        user_id: i64,
        display_name: impl Into<String>,
        permissions: Vec<String>,
    ) -> Result<Self, Error> {
        let token = token.into();

        if token.is_empty() {
            return Err(Error::EmptyToken);
        }

        Ok(Self {
            token,
            user_id,
            display_name: display_name.into(),
            permissions,
        })
    }

    // === Getters ===

    /// Opaque bearer credential issued at login.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Backend identifier of the user.
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Human readable name, for display only.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Permission labels granted to this user, in server order.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    // === Setters ===

    /// Replace the display name, e.g. after a profile edit.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.display_name = display_name.into();
        self
    }

    // === Public Methods ===

    /// `true` if any label in `required` was granted to this session.
    pub fn has_any_permission<R: AsRef<str>>(&self, required: &[R]) -> bool {
        is_authorized(required, &self.permissions)
    }

    /// Serialize this session to its canonical JSON representation.
    pub fn serialize(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("Session::serialize")
    }

    /// Deserialize this session from its canonical JSON representation.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::EmptyPayload);
        }

        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Body returned by the backend on a successful login.
#[derive(Clone, Serialize, Deserialize, Debug, Eq, PartialEq)]
pub struct LoginResponse {
    /// Bearer credential.
    pub access_token: String,
    /// Granted permission labels.
    #[serde(rename = "TipoPermiso", deserialize_with = "one_or_many", default)]
    pub permissions: Vec<String>,
    /// User id.
    #[serde(rename = "IdUsuario")]
    pub user_id: i64,
    /// Display name.
    #[serde(rename = "Nombre", deserialize_with = "null_as_empty", default)]
    pub display_name: String,
}

impl TryFrom<LoginResponse> for Session {
    type Error = Error;

    fn try_from(value: LoginResponse) -> Result<Self, Error> {
        Session::new(
            value.access_token,
            value.user_id,
            value.display_name,
            value.permissions,
        )
    }
}

#[derive(Deserialize)]
struct RawSession {
    token: String,
    #[serde(rename = "IdUsuario")]
    user_id: i64,
    #[serde(rename = "Nombre", deserialize_with = "null_as_empty", default)]
    display_name: String,
    #[serde(rename = "TipoPermiso", deserialize_with = "one_or_many", default)]
    permissions: Vec<String>,
}

impl TryFrom<RawSession> for Session {
    type Error = Error;

    fn try_from(raw: RawSession) -> Result<Self, Error> {
        Session::new(raw.token, raw.user_id, raw.display_name, raw.permissions)
    }
}

/// Accepts `"label"` as well as `["label", ...]`. `null` is no labels.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(label)) => vec![label],
        Some(OneOrMany::Many(labels)) => labels,
        None => Vec::new(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(thiserror::Error, Debug)]
/// Error creating or deserializing a [Session].
pub enum Error {
    #[error("Empty payload")]
    /// Empty payload
    EmptyPayload,
    #[error("Session token must not be empty")]
    /// A session always carries a bearer token.
    EmptyToken,
    #[error(transparent)]
    /// Error parsing the JSON representation.
    Parsing(#[from] serde_json::Error),
}
