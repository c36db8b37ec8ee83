#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

mod auth;
mod ceia;
mod client;
pub mod errors;
mod guard;
mod macros;
mod resources;
mod session;
mod store;
mod util;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Transport
pub use client::api::ApiClient;
pub use client::core::{CeiaHttpClient, CeiaHttpClientBuilder};
// High level actors
pub use auth::Credentials;
pub use ceia::Ceia;
pub use guard::{Navigation, RouteGuard};
pub use resources::{
    ApiResource, ResourceClient,
    images::{ImageClient, ImageOwner, ImageUpload},
};
// Session persistence
pub use session::{
    codec::{EncryptedBlob, SessionCodec},
    store::SessionStore,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

// Error
pub use errors::{BuildError, Error, Result};

// Re-exports
pub use ceia_common::{
    constants,
    crypto::SessionKey,
    permissions::{PermissionRequirement, Route, RouteTable, is_authorized, labels},
    session::Session,
};
pub use reqwest::{Method, StatusCode};
