//! Error types for the API client pipeline.
//!
//! # Design
//! One enum covers every stage of a request: building it (`Url`,
//! `Encoding`), executing it (`Transport`), checking it (`Api`), decoding
//! it (`Decoding`), and looking up the service that issued it (`NotFound`,
//! `UnboundService`). Nothing is retried or swallowed; the caller decides.

use thiserror::Error;

/// Errors returned by the request builder, dispatcher, and service registry.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request path could not be parsed or resolved against the base URL.
    #[error("invalid url: {0}")]
    Url(String),

    /// The request payload could not be serialized to JSON.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// The transport failed before an HTTP response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status the response checker rejected.
    #[error("{}", format_api_error(.method, .url, .status, .message))]
    Api {
        status: u16,
        method: String,
        url: String,
        message: Option<String>,
        /// Headers of the rejected response, e.g. `Retry-After`.
        headers: Vec<(String, String)>,
    },

    /// The response body does not match the expected shape.
    #[error("decoding failed: {0}")]
    Decoding(String),

    /// No service is registered under this name.
    #[error("{0} does not exist")]
    NotFound(String),

    /// The service was used before being registered with a client.
    #[error("service {0} is not bound to a client")]
    UnboundService(String),
}

impl ApiError {
    /// HTTP status code carried by an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response headers carried by an `Api` error; empty otherwise.
    pub fn headers(&self) -> &[(String, String)] {
        match self {
            ApiError::Api { headers, .. } => headers,
            _ => &[],
        }
    }

    /// Header `name` of the rejected response, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::http::find_header(self.headers(), name)
    }

    /// Server-supplied message carried by an `Api` error.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn format_api_error(method: &str, url: &str, status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{method} {url}: {status} {message}"),
        None => format!("request failed: {method} {url}: {status}"),
    }
}
