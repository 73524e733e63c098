//! Startup configuration of the HTTP transport.

use std::time::Duration;

use reqwest::Url;
use signup::ConfigurationError;

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed settings for every call made by [`HttpTransport`](crate::HttpTransport).
///
/// Only constructible through [`TransportConfig::parse`], so an instance always
/// holds a usable origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    base_origin: Url,
    with_credentials: bool,
    timeout: Duration,
    session_cookies: Vec<String>,
}

impl TransportConfig {
    /// Validates `base_origin` and returns a configuration with credentials
    /// enabled and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the origin is blank, unparseable,
    /// not `http`/`https`, has no host, or carries a path, query, or fragment.
    pub fn parse(base_origin: &str) -> Result<Self, ConfigurationError> {
        let trimmed = base_origin.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::MissingBaseOrigin);
        }

        let invalid = |reason: &str| ConfigurationError::InvalidBaseOrigin {
            value: trimmed.to_owned(),
            reason: reason.to_owned(),
        };

        let url = Url::parse(trimmed).map_err(|error| invalid(&error.to_string()))?;
        match url.scheme() {
            "https" => {}
            "http" => {
                tracing::warn!(origin = %url, "base origin is not HTTPS; session cookies travel in clear text");
            }
            other => {
                return Err(ConfigurationError::UnsupportedScheme {
                    scheme: other.to_owned(),
                })
            }
        }
        if url.host_str().is_none() {
            return Err(invalid("origin has no host"));
        }
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("origin must not carry a path, query, or fragment"));
        }

        Ok(Self {
            base_origin: url,
            with_credentials: true,
            timeout: DEFAULT_TIMEOUT,
            session_cookies: Vec::new(),
        })
    }

    /// Enables or disables credential forwarding (cookies) for every call.
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Seeds a session cookie (`name=value`, optionally with attributes)
    /// supplied by the hosting environment. Ignored without credentials.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookies.push(cookie.into());
        self
    }

    /// The origin every path is resolved against.
    pub fn base_origin(&self) -> &Url {
        &self.base_origin
    }

    /// Whether cookies are stored and sent.
    pub fn credentials_enabled(&self) -> bool {
        self.with_credentials
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Cookies seeded at startup.
    pub fn session_cookies(&self) -> &[String] {
        &self.session_cookies
    }
}
