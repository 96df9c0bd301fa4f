//! The transport seam: whatever actually moves bytes over the network.
//!
//! # Design
//! The pipeline only needs `execute(request) -> response`. Status codes are
//! never errors at this layer; only failures to obtain a response are.
//! `UreqTransport` is the stock implementation. Tests plug in closures.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes `HttpRequest`s. Must be safe to share between threads if the
/// owning client is.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::io::Cursor;
    use std::time::Duration;

    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// `Transport` backed by a blocking `ureq::Agent`.
    ///
    /// The agent is configured so 4xx/5xx responses come back as data; the
    /// client's response checker interprets them.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::with_timeout(None)
        }

        /// Agent whose whole request (connect, send, receive) is bounded by
        /// `timeout`.
        pub fn with_timeout(timeout: Option<Duration>) -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Wrap an existing agent. It should have `http_status_as_error`
        /// disabled, otherwise error statuses surface as transport errors.
        pub fn with_agent(agent: Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let url = request.url.as_str();
            let body = request.body.as_deref();
            let headers = &request.headers;

            let result = match (request.method, body) {
                (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(url), headers)
                    .force_send_body()
                    .send(body.as_bytes()),
                (HttpMethod::Get, None) => with_headers(self.agent.get(url), headers).call(),
                (HttpMethod::Head, Some(_)) => {
                    return Err(ApiError::Encoding("HEAD request cannot carry a body".to_string()));
                }
                (HttpMethod::Head, None) => with_headers(self.agent.head(url), headers).call(),
                (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                    .force_send_body()
                    .send(body.as_bytes()),
                (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
                (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body.as_bytes()),
                (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
                (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body.as_bytes()),
                (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
                (HttpMethod::Patch, Some(body)) => with_headers(self.agent.patch(url), headers).send(body.as_bytes()),
                (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
            };
            let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = if request.method == HttpMethod::Head {
                Vec::new()
            } else {
                response
                    .body_mut()
                    .read_to_vec()
                    .map_err(|e| ApiError::Transport(e.to_string()))?
            };

            Ok(HttpResponse::new(status, headers, Cursor::new(body)))
        }
    }
}
