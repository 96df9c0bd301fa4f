//! Fortnite Tracker API binding built on `bone-core`.
//!
//! # Overview
//! `fortnite::new(token)` returns a `Client` pointed at the tracker with
//! the `TRN-Api-Key` header configured and a `ProfileService` registered
//! under `"profile"`:
//!
//! ```no_run
//! let client = fortnite::new("my-api-key")?;
//! let stats = fortnite::profile(&client)?.stats("pc", "ninja")?;
//! let history = fortnite::profile(&client)?.match_history(&stats.account_id)?;
//! # Ok::<(), bone_core::ApiError>(())
//! ```
//!
//! # Design
//! The tracker reports some failures as `{"error": "..."}` bodies, at
//! times with a 200 status, so the binding installs its own
//! `check_response` instead of the core default.

pub mod profile;
pub mod types;

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;

use bone_core::check::api_error;
use bone_core::{ApiError, Client, ClientBuilder, HttpRequest, HttpResponse};
use serde::Deserialize;

pub use profile::ProfileService;
pub use types::{LifeTimeStat, Match, PlayerStats, RatioField, ScoreField, StatField, Stats};

pub const DEFAULT_BASE_URL: &str = "https://api.fortnitetracker.com/v1/";
pub const USER_AGENT: &str = concat!("fortnite-rs/", env!("CARGO_PKG_VERSION"));
pub const TOKEN_KEY: &str = "TRN-Api-Key";
pub const PROFILE_SERVICE: &str = "profile";

/// Builder preconfigured for the tracker. Override the transport or base
/// URL before passing it to `from_builder`.
pub fn builder(token: &str) -> ClientBuilder {
    Client::builder()
        .base_url(DEFAULT_BASE_URL)
        .user_agent(USER_AGENT)
        .token_key(TOKEN_KEY)
        .token(token)
        .response_checker(check_response)
}

/// Tracker client with the profile service registered.
pub fn new(token: &str) -> Result<Client, ApiError> {
    from_builder(builder(token))
}

/// Build `builder` and register the tracker services on the result.
pub fn from_builder(builder: ClientBuilder) -> Result<Client, ApiError> {
    let mut client = builder.build()?;
    client.set_service(PROFILE_SERVICE, ProfileService::new());
    Ok(client)
}

/// The registered profile service.
pub fn profile(client: &Client) -> Result<Arc<ProfileService>, ApiError> {
    client.service::<ProfileService>(PROFILE_SERVICE)
}

#[derive(Deserialize)]
struct TrackerError {
    message: Option<String>,
    error: Option<String>,
}

fn parse_error(body: &[u8]) -> Option<TrackerError> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// Tracker response checker.
///
/// Non-2xx responses fail, with the message taken from a `message` or
/// `error` body field. A 2xx body consisting of an `error` field also
/// fails; any other 2xx body is handed on to the decoder unchanged.
pub fn check_response(request: &HttpRequest, response: &mut HttpResponse) -> Result<(), ApiError> {
    let body = response
        .read_body()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let parsed = parse_error(&body);

    if !response.is_success() {
        let message = parsed.and_then(|e| e.message.or(e.error));
        return Err(api_error(request, response, message));
    }
    if let Some(TrackerError { error: Some(error), .. }) = parsed {
        return Err(api_error(request, response, Some(error)));
    }
    response.body = Box::new(Cursor::new(body));
    Ok(())
}

/// Platforms the tracker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Pc,
    Xbl,
    Psn,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Pc => "pc",
            Platform::Xbl => "xbl",
            Platform::Psn => "psn",
        }
    }
}

impl AsRef<str> for Platform {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pc" => Ok(Platform::Pc),
            "xbl" | "xbox" => Ok(Platform::Xbl),
            "psn" | "ps4" => Ok(Platform::Psn),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}
