//! Common imports for quick starts.

// Common
pub use crate::{BuildError, Error, Session};

// Transport
pub use crate::{CeiaHttpClient, CeiaHttpClientBuilder};

// High level actors
// Entry point owning the transport and the session store.
pub use crate::Ceia;
// Sign-in form.
pub use crate::Credentials;
// Route protection.
pub use crate::{Navigation, RouteGuard};
// REST collections and image attachments.
pub use crate::{ApiResource, ImageOwner, ImageUpload};

// Session persistence
pub use crate::{FileStore, KeyValueStore, MemoryStore, SessionStore};
