//! Unified error types for the `ceia-sdk` crate.
//!
//! This module centralizes all failures that can occur while using the SDK and
//! provides a single top-level [`Error`] enum plus the convenient [`Result`] alias.
//! Errors from lower layers (`reqwest`, `ceia_common`, URL parsing, the key-value
//! store) are mapped into structured variants so callers can handle them precisely.
//!
//! A missing, corrupted or foreign session blob is **not** an error anywhere in
//! this crate: it reads as "no session".

use thiserror::Error;

use crate::store::StoreError;

// --- Build-Time Error ---

/// Errors that can occur while building a [`crate::CeiaHttpClient`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// No API base URL was configured.
    #[error("The API base URL is required")]
    MissingBaseUrl,

    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// --- The Main Operational Error Enum ---

/// The crate’s top-level error type.
///
/// It groups failures into high-level categories:
/// - [`Error::Request`]: HTTP transport/server/validation issues
/// - [`Error::Parse`]: URL parsing failures
/// - [`Error::Authentication`]: login/session issues
/// - [`Error::Store`]: the persistent key-value store failed
/// - [`Error::Build`]: construction of the client failed
///
/// Most lower-level errors automatically convert into this enum via `From`.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request/response failed (transport, server, validation, JSON).
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// URL parsing failed while preparing a request.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// Authentication failed or requires a session that does not exist.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// Reading or writing the persistent key-value store failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Building the client failed.
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),
}

impl Error {
    /// The server's human-readable message, when the failure came from a non-2xx response.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Request(RequestError::Server { message, .. }) => Some(message),
            _ => None,
        }
    }
}

// --- Consolidated Authentication Error ---

/// Errors originating from the login flow and session-bound calls.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server's login body could not be turned into a session.
    #[error("Session handling failed: {0}")]
    Session(#[from] ceia_common::session::Error),

    /// The call needs a signed-in user and the store holds no session.
    #[error("Not signed in")]
    NotSignedIn,

    /// Caller or input validation error.
    #[error("General authentication error: {0}")]
    Validation(String),
}

// --- Consolidated Request Error ---

/// Transport and server-side HTTP errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a non-success status. Includes status and body message.
    #[error("Server responded with an error: {status} - {message}")]
    Server {
        /// The HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// The body's `message` field, the raw body, or the canonical reason.
        message: String,
    },

    /// Caller supplied an invalid path/argument for this API.
    #[error("Invalid request: {message}")]
    Validation {
        /// Human-readable explanation of what was invalid.
        message: String,
    },

    /// JSON decoding failed when parsing a server response.
    #[error("JSON decode error: {message}")]
    DecodeJson {
        /// Error message from the JSON deserializer.
        message: String,
    },
}

/// A specialized `Result` type for `ceia-sdk` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

// Auth Errors
impl_from_for_error!(ceia_common::session::Error, Error::Authentication);

// Request Errors
impl_from_for_error!(reqwest::Error, Error::Request);
impl_from_for_error!(serde_json::Error, Error::Request);

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::DecodeJson {
            message: err.to_string(),
        }
    }
}
