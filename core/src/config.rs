//! Client configuration and construction.
//!
//! `ClientConfig` is the serializable part (URLs, names, secrets) and can be
//! loaded from any serde source. `ClientBuilder` adds the parts that are
//! code: the transport and the response checker.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::check::{check_response, ResponseChecker};
use crate::client::{Client, Pipeline};
use crate::error::ApiError;
use crate::transport::Transport;

pub const DEFAULT_USER_AGENT: &str = concat!("bone/", env!("CARGO_PKG_VERSION"));

/// Plain-data client settings.
///
/// Missing fields take their defaults, so a config file only needs the
/// values it changes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Absolute URL every request path is resolved against.
    pub base_url: Option<String>,
    pub user_agent: String,
    /// Name of the auth header. Auth is sent only when both this and
    /// `token` are non-empty.
    pub token_key: String,
    pub token: String,
    /// Overall timeout handed to the default transport.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token_key: String::new(),
            token: String::new(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("token_key", &self.token_key)
            .field("token", &token)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Builder for `Client`.
///
/// Without an explicit transport, `build` uses `UreqTransport` (when the
/// `ureq` feature is on). Without an explicit checker it uses
/// `check_response`.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Box<dyn Transport>>,
    checker: Option<Box<dyn ResponseChecker>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = Some(base_url.to_string());
        self
    }

    /// Set the user agent. An empty string keeps the current one.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        if !user_agent.is_empty() {
            self.config.user_agent = user_agent.to_string();
        }
        self
    }

    pub fn token_key(mut self, token_key: &str) -> Self {
        self.config.token_key = token_key.to_string();
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.config.token = token.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn response_checker(mut self, checker: impl ResponseChecker + 'static) -> Self {
        self.checker = Some(Box::new(checker));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build(self) -> Result<Client, ApiError> {
        let ClientConfig {
            base_url,
            user_agent,
            token_key,
            token,
            timeout_secs,
        } = self.config;

        let base_url = base_url
            .map(|raw| Url::parse(&raw).map_err(|e| ApiError::Url(format!("{raw}: {e}"))))
            .transpose()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(timeout_secs.map(Duration::from_secs))?,
        };

        Ok(Client::from_pipeline(Pipeline {
            transport,
            base_url,
            user_agent,
            token_key,
            token,
            checker: self
                .checker
                .unwrap_or_else(|| Box::new(check_response) as Box<dyn ResponseChecker>),
        }))
    }
}

#[cfg(feature = "ureq")]
fn default_transport(timeout: Option<Duration>) -> Result<Box<dyn Transport>, ApiError> {
    Ok(Box::new(crate::transport::UreqTransport::with_timeout(timeout)))
}

#[cfg(not(feature = "ureq"))]
fn default_transport(_timeout: Option<Duration>) -> Result<Box<dyn Transport>, ApiError> {
    Err(ApiError::Transport(
        "no transport configured and the `ureq` feature is disabled".to_string(),
    ))
}
