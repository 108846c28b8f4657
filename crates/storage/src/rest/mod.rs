use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::repository::Storage;

mod account_repo;
mod client;
mod error_body;
mod progress_repo;
mod quiz_repo;
mod topic_repo;
mod user_repo;
mod vocabulary_repo;
mod wire;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestInitError {
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported API URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Always ends in `/` so endpoint paths join relative to it.
    pub base_url: Url,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl RestConfig {
    /// # Errors
    ///
    /// Returns `RestInitError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, RestInitError> {
        let trimmed = base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };
        let base_url = Url::parse(&normalized)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(RestInitError::UnsupportedScheme(base_url.scheme().to_owned()));
        }
        Ok(Self {
            base_url,
            timeout: Some(DEFAULT_TIMEOUT),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Backend adapter speaking the Wordify REST API.
///
/// Clones share the HTTP connection pool and the bearer token.
#[derive(Clone)]
pub struct RestRepository {
    client: Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl RestRepository {
    /// # Errors
    ///
    /// Returns `RestInitError::Client` if the HTTP client cannot be built.
    pub fn new(config: RestConfig) -> Result<Self, RestInitError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the bearer token sent with every request.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Storage {
    /// Build a `Storage` backed by the REST API.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` if the HTTP client cannot be built.
    pub fn rest(config: RestConfig) -> Result<Self, RestInitError> {
        Ok(Self::from_repository(RestRepository::new(config)?))
    }
}
