use std::fmt::Debug;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use url::Url;

use crate::errors::{BuildError, Result};

const DEFAULT_USER_AGENT: &str = concat!("ceia-dashboard", "@", env!("CARGO_PKG_VERSION"),);

#[derive(Debug, Clone, Default)]
#[must_use]
/// Configures a [`CeiaHttpClient`] before construction.
///
/// # Defaults
/// - Base URL: none; [`Self::build`] fails without one.
/// - HTTP request timeout: reqwest default (no global timeout) unless set via
///   [`Self::request_timeout`]
/// - User-agent: `ceia-dashboard@<crate-version>` plus any [`Self::user_agent_extra`]
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use ceia_sdk::CeiaHttpClient;
/// let client = CeiaHttpClient::builder()
///     .base_url("https://api.example.org/v1")?
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("ceia-cli/0.1.0")
///     .build()?;
/// # Ok::<_, ceia_sdk::Error>(())
/// ```
pub struct CeiaHttpClientBuilder {
    base_url: Option<Url>,
    http_request_timeout: Option<Duration>,

    /// Optional user-agent segment appended to the default UA.
    user_agent_extra: Option<String>,
}

impl CeiaHttpClientBuilder {
    /// Set the API base URL every request path is resolved against.
    ///
    /// A trailing `/` is added when missing so that `https://host/api`
    /// and `https://host/api/` resolve `usuarios` to the same URL.
    pub fn base_url(&mut self, url: &str) -> std::result::Result<&mut Self, url::ParseError> {
        let mut url = Url::parse(url)?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        self.base_url = Some(url);

        Ok(self)
    }

    /// Set HTTP requests timeout.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.http_request_timeout = Some(timeout);

        self
    }

    /// Append an extra user-agent segment after the default `ceia-dashboard@<version>`.
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Build [`CeiaHttpClient`]
    pub fn build(&self) -> std::result::Result<CeiaHttpClient, BuildError> {
        let base_url = self.base_url.clone().ok_or(BuildError::MissingBaseUrl)?;

        // Compose user agent with optional extra part.
        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                &format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT,
        };

        #[allow(unused_mut, reason = "only mutated on native targets")]
        let mut http_builder = reqwest::Client::builder().user_agent(user_agent);

        // reqwest ignores timeouts in wasm; the browser owns them there.
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.http_request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(CeiaHttpClient {
            http: http_builder.build()?,
            base_url,
        })
    }
}

/// Transport client for the CEIA REST API.
///
/// `CeiaHttpClient` is the low-level, stateless engine the higher-level actors
/// are built on. It resolves request paths against the configured base URL and
/// knows nothing about sessions: it never attaches credentials. For
/// authenticated calls use [`crate::ApiClient`], which decorates these
/// requests with the bearer credential of the current session.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct CeiaHttpClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
}

impl CeiaHttpClient {
    /// Returns a builder to edit settings before creating [`CeiaHttpClient`].
    pub fn builder() -> CeiaHttpClientBuilder {
        CeiaHttpClientBuilder::default()
    }

    /// Client with default settings for `base_url`.
    pub fn new(base_url: &str) -> Result<CeiaHttpClient> {
        Ok(Self::builder().base_url(base_url)?.build()?)
    }

    // === Getters ===

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL.
    ///
    /// Leading slashes are ignored, so `/equipos` and `equipos` both land under
    /// the base path. Absolute URLs are used as given.
    pub fn endpoint(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    /// Start building an **unauthenticated** request to `path`.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;

        Ok(self.http.request(method, url))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_base_url() {
        assert!(matches!(
            CeiaHttpClient::builder().build(),
            Err(BuildError::MissingBaseUrl)
        ));
    }

    #[test]
    fn invalid_base_url() {
        assert!(CeiaHttpClient::builder().base_url("not a url").is_err());
    }

    #[test]
    fn endpoints_stay_under_the_base_path() {
        for base in ["https://api.example.org/v1", "https://api.example.org/v1/"] {
            let client = CeiaHttpClient::new(base).unwrap();

            assert_eq!(client.base_url().as_str(), "https://api.example.org/v1/");
            assert_eq!(
                client.endpoint("/equipos/3/imagenes").unwrap().as_str(),
                "https://api.example.org/v1/equipos/3/imagenes"
            );
            assert_eq!(
                client.endpoint("login").unwrap().as_str(),
                "https://api.example.org/v1/login"
            );
        }
    }

    #[test]
    fn absolute_urls_pass_through() {
        let client = CeiaHttpClient::new("https://api.example.org/").unwrap();

        assert_eq!(
            client.endpoint("https://other.example.org/x").unwrap().as_str(),
            "https://other.example.org/x"
        );
    }

    #[test]
    fn plain_requests_carry_no_credentials() {
        let client = CeiaHttpClient::new("https://api.example.org/").unwrap();
        let request = client
            .request(Method::GET, "usuarios")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "https://api.example.org/usuarios");
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
