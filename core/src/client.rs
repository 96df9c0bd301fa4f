//! The client and its request pipeline.
//!
//! # Design
//! `Pipeline` is the immutable part of a client: transport, base URL,
//! user agent, auth header, and response checker. It builds requests and
//! dispatches them. `Client` owns an `Arc<Pipeline>` plus the service
//! registry; each registered service gets a `ClientHandle`, a cheap clone
//! of that `Arc`, so services share the pipeline without seeing the
//! registry.
//!
//! A dispatch is a single round-trip: execute, check, decode. The response
//! body is owned by the dispatcher and dropped once the call returns,
//! whichever branch it took.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::check::ResponseChecker;
use crate::config::ClientBuilder;
use crate::decode::ResponseDecoder;
use crate::error::ApiError;
use crate::http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse};
use crate::service::{Service, ServiceRegistry};
use crate::transport::Transport;

/// Request builder and dispatcher shared by a client and its services.
pub struct Pipeline {
    pub(crate) transport: Box<dyn Transport>,
    pub(crate) base_url: Option<Url>,
    pub(crate) user_agent: String,
    pub(crate) token_key: String,
    pub(crate) token: String,
    pub(crate) checker: Box<dyn ResponseChecker>,
}

impl Pipeline {
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// Build a request without a body.
    ///
    /// `path` is resolved against the base URL: relative paths extend the
    /// base path, absolute URLs replace it. `headers` are applied last and
    /// override the defaults (`User-Agent`, the auth header).
    pub fn new_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(method, path, headers, None)
    }

    /// Build a request whose body is `body` serialized as JSON.
    pub fn new_request_with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encoding(e.to_string()))?;
        self.build_request(method, path, headers, Some(body))
    }

    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| ApiError::Url("base URL is not set".to_string()))?;
        let url = base.join(path).map_err(|e| ApiError::Url(format!("{path}: {e}")))?;

        let mut request = HttpRequest {
            method,
            url: url.into(),
            headers: Vec::new(),
            body,
        };
        request.set_header("User-Agent", &self.user_agent);
        if request.body.is_some() {
            request.set_header("Content-Type", "application/json");
        }
        if !self.token_key.is_empty() && !self.token.is_empty() {
            request.set_header(&self.token_key, &self.token);
        }
        for (name, value) in headers {
            request.set_header(name, value);
        }
        Ok(request)
    }

    /// Execute `request`, check the response, and decode the body as `T`.
    ///
    /// Nothing is decoded when the checker rejects the response.
    pub fn dispatch<T, D>(&self, request: &HttpRequest, decoder: &D) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        D: ResponseDecoder,
    {
        let mut response = self.execute_checked(request)?;
        let body = decoder.decode::<T>(&mut response.body).inspect_err(|err| {
            warn!(method = %request.method, url = %request.url, error = %err, "failed to decode response");
        })?;
        drain(request, &mut response);
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            body,
        })
    }

    /// Execute `request` and check the response, ignoring its body.
    pub fn dispatch_discard(&self, request: &HttpRequest) -> Result<ApiResponse<()>, ApiError> {
        let mut response = self.execute_checked(request)?;
        drain(request, &mut response);
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            body: (),
        })
    }

    fn execute_checked(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let mut response = self.transport.execute(request).inspect_err(|err| {
            warn!(method = %request.method, url = %request.url, error = %err, "transport failed");
        })?;
        debug!(method = %request.method, url = %request.url, status = response.status, "received response");

        if let Err(mut err) = self.checker.check(request, &mut response) {
            warn!(method = %request.method, url = %request.url, status = response.status, error = %err, "response rejected");
            if let ApiError::Api { headers, .. } = &mut err {
                if headers.is_empty() {
                    headers.clone_from(&response.headers);
                }
            }
            return Err(err);
        }
        Ok(response)
    }
}

/// Discard what is left of an accepted response body. A failure here comes
/// after the call already succeeded, so it is logged rather than returned.
fn drain(request: &HttpRequest, response: &mut HttpResponse) {
    if let Err(err) = response.drain() {
        warn!(method = %request.method, url = %request.url, error = %err, "failed to drain response body");
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("user_agent", &self.user_agent)
            .field("token_key", &self.token_key)
            .finish_non_exhaustive()
    }
}

/// What a service holds on to: a shared reference to its client's pipeline.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    pipeline: Arc<Pipeline>,
}

impl Deref for ClientHandle {
    type Target = Pipeline;

    fn deref(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// API client: a request pipeline plus a registry of services bound to it.
///
/// Configuration is fixed at build time. Registering services needs
/// `&mut self`, so registration finishes before the client is shared.
pub struct Client {
    pipeline: Arc<Pipeline>,
    services: ServiceRegistry,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            services: ServiceRegistry::new(),
        }
    }

    /// A handle sharing this client's pipeline.
    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            pipeline: Arc::clone(&self.pipeline),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn new_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        self.pipeline.new_request(method, path, headers)
    }

    pub fn new_request_with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.pipeline.new_request_with_body(method, path, headers, body)
    }

    pub fn dispatch<T, D>(&self, request: &HttpRequest, decoder: &D) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        D: ResponseDecoder,
    {
        self.pipeline.dispatch(request, decoder)
    }

    pub fn dispatch_discard(&self, request: &HttpRequest) -> Result<ApiResponse<()>, ApiError> {
        self.pipeline.dispatch_discard(request)
    }

    /// Bind `service` to this client and register it under `name`,
    /// replacing any service already registered there.
    pub fn set_service<S: Service>(&mut self, name: &str, mut service: S) {
        service.bind(self.handle());
        self.services.set(name, Arc::new(service));
    }

    pub fn get_service(&self, name: &str) -> Result<Arc<dyn Service>, ApiError> {
        self.services.get(name)
    }

    /// Registered service `name` as its concrete type.
    pub fn service<S: Service>(&self, name: &str) -> Result<Arc<S>, ApiError> {
        self.services.get_as(name)
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.services.contains(name)
    }

    /// Unregister `name`, returning the service if one was there. Handles
    /// the service already gave out keep working.
    pub fn remove_service(&mut self, name: &str) -> Option<Arc<dyn Service>> {
        self.services.remove(name)
    }

    /// Registered service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        self.services.names()
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.services
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("pipeline", &self.pipeline)
            .field("services", &self.services.names())
            .finish()
    }
}
