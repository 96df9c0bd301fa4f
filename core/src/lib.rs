//! Thin scaffold for authenticated JSON API clients.
//!
//! # Overview
//! A `Client` resolves request paths against a base URL, attaches the
//! user agent and a static auth header, executes requests through a
//! pluggable `Transport`, classifies responses with a per-client
//! `ResponseChecker`, and decodes bodies with a `ResponseDecoder`.
//! Domain bindings register `Service`s on the client; each service is
//! handed a `ClientHandle` and issues its requests through it.
//!
//! # Design
//! - Configuration is fixed once `ClientBuilder::build` returns.
//! - No retries, caching, pagination, or token refresh. Every failure is
//!   returned to the caller as an `ApiError`.
//! - `UreqTransport` (feature `ureq`, on by default) is the stock transport.

pub mod check;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;

pub use check::{check_response, ResponseChecker};
pub use client::{Client, ClientHandle, Pipeline};
pub use config::{ClientBuilder, ClientConfig, DEFAULT_USER_AGENT};
pub use decode::{JsonDecoder, ResponseDecoder};
pub use error::ApiError;
pub use http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse};
pub use service::{Service, ServiceRegistry};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
