//! Client configuration

use crate::error::{Result, SdkError};
use readsutils_core::port::{Authorization, TransportOptions};
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// How the client authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Auth service token, sent as the `Authorization` header value
    Token(String),
    /// User name and password; HTTP Basic unless exchanged for a token at login
    Password { user: String, password: String },
}

impl Credentials {
    pub(crate) fn authorization(&self) -> Authorization {
        match self {
            Credentials::Token(token) => Authorization::Token(token.clone()),
            Credentials::Password { user, password } => Authorization::Basic {
                user: user.clone(),
                password: password.clone(),
            },
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(<redacted>)"),
            Credentials::Password { user, .. } => f
                .debug_struct("Password")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Endpoint configuration for a [`ReadsUtilsClient`](crate::ReadsUtilsClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    url: Url,
    credentials: Option<Credentials>,
    auth_url: Option<Url>,
    insecure_http_allowed: bool,
    all_certs_trusted: bool,
    streaming_mode: bool,
    read_timeout: Option<Duration>,
    service_version: Option<String>,
}

impl ClientConfig {
    /// Configuration for the service at `url`, anonymous, all switches off
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: parse_url(url)?,
            credentials: None,
            auth_url: None,
            insecure_http_allowed: false,
            all_certs_trusted: false,
            streaming_mode: false,
            read_timeout: None,
            service_version: None,
        })
    }

    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// - `READSUTILS_URL`: service endpoint (required)
    /// - `KB_AUTH_TOKEN`: auth token
    /// - `READSUTILS_AUTH_URL`: login endpoint for user/password exchange
    /// - `READSUTILS_INSECURE_HTTP`: allow credentials over plain http
    /// - `READSUTILS_TRUST_ALL_CERTS`: skip certificate validation
    /// - `READSUTILS_STREAMING`: stream request bodies
    /// - `READSUTILS_READ_TIMEOUT_MS`: read timeout, `0` for none
    /// - `READSUTILS_SERVICE_VER`: service version pin
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("READSUTILS_URL")
            .ok_or_else(|| SdkError::InvalidUrl("READSUTILS_URL is not set".to_string()))?;
        let flag = |key: &str| lookup(key).map(|v| parse_flag(&v)).unwrap_or(false);

        let mut config = Self::new(&url)?;
        if let Some(token) = lookup("KB_AUTH_TOKEN").filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(auth_url) = lookup("READSUTILS_AUTH_URL") {
            config = config.with_auth_url(&auth_url)?;
        }
        config.set_insecure_http_allowed(flag("READSUTILS_INSECURE_HTTP"));
        config.set_all_certs_trusted(flag("READSUTILS_TRUST_ALL_CERTS"));
        config.set_streaming_mode(flag("READSUTILS_STREAMING"));
        config.set_read_timeout(
            lookup("READSUTILS_READ_TIMEOUT_MS").and_then(|s| s.parse().ok()),
        );
        config.set_service_version(lookup("READSUTILS_SERVICE_VER").filter(|v| !v.is_empty()));

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Token(token.into()));
        self
    }

    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Password {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// Login endpoint used by `ReadsUtilsClient::connect` to trade a password for a token
    pub fn with_auth_url(mut self, auth_url: &str) -> Result<Self> {
        self.auth_url = Some(parse_url(auth_url)?);
        Ok(self)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub(crate) fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn auth_url(&self) -> Option<&Url> {
        self.auth_url.as_ref()
    }

    /// Whether credentials may travel over plain `http://`
    pub fn is_insecure_http_allowed(&self) -> bool {
        self.insecure_http_allowed
    }

    pub fn set_insecure_http_allowed(&mut self, allowed: bool) {
        self.insecure_http_allowed = allowed;
    }

    pub fn is_all_certs_trusted(&self) -> bool {
        self.all_certs_trusted
    }

    /// Accept self-signed and otherwise invalid server certificates
    pub fn set_all_certs_trusted(&mut self, trusted: bool) {
        self.all_certs_trusted = trusted;
    }

    pub fn is_streaming_mode(&self) -> bool {
        self.streaming_mode
    }

    /// Serialize request bodies while sending instead of buffering them
    pub fn set_streaming_mode(&mut self, streaming: bool) {
        self.streaming_mode = streaming;
    }

    /// Read timeout in milliseconds; `None` or `Some(0)` waits forever
    pub fn read_timeout(&self) -> Option<u64> {
        self.read_timeout.map(|d| d.as_millis() as u64)
    }

    pub fn set_read_timeout(&mut self, millis: Option<u64>) {
        self.read_timeout = millis.filter(|&ms| ms > 0).map(Duration::from_millis);
    }

    pub fn service_version(&self) -> Option<&str> {
        self.service_version.as_deref()
    }

    /// Pin calls to a specific release of the service (e.g. "dev", "beta", a git hash)
    pub fn set_service_version(&mut self, version: Option<String>) {
        self.service_version = version;
    }

    pub(crate) fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            read_timeout: self.read_timeout,
            trust_all_certs: self.all_certs_trusted,
        }
    }

    pub(crate) fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| SdkError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SdkError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            url, other
        ))),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
