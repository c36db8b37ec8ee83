//! Constants used across the CEIA dashboard crates.

/// Key under which the encrypted session blob lives in the client's key-value store.
pub const SESSION_STORAGE_KEY: &str = "userData";

/// Fixed navigation targets.
pub mod routes {
    /// Where the route guard sends navigations that fail the permission check.
    pub const UNAUTHORIZED: &str = "/unauthorized";
    /// The index route.
    pub const INDEX: &str = "/";
    /// Where the index route redirects to.
    pub const DEFAULT: &str = "/usuarios";
}

/// Backend endpoints consumed by the auth flow.
pub mod endpoints {
    /// `POST` credentials, returns a login body.
    pub const LOGIN: &str = "login";
    /// `POST` with the bearer credential to invalidate it server-side.
    pub const LOGOUT: &str = "logout";
}
