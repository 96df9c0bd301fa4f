//! Response checking: deciding whether a response is a success.
//!
//! A checker sees the request that produced the response (for error
//! context) and may read the response body. Each client carries its own
//! checker; `check_response` is the one installed when none is configured.

use serde::Deserialize;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Policy classifying a response as success or error.
pub trait ResponseChecker: Send + Sync {
    fn check(&self, request: &HttpRequest, response: &mut HttpResponse) -> Result<(), ApiError>;
}

impl<F> ResponseChecker for F
where
    F: Fn(&HttpRequest, &mut HttpResponse) -> Result<(), ApiError> + Send + Sync,
{
    fn check(&self, request: &HttpRequest, response: &mut HttpResponse) -> Result<(), ApiError> {
        self(request, response)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Default checker. Statuses 200..=299 pass. Anything else becomes
/// `ApiError::Api`, with `message` taken from a `{"message": "..."}` body
/// when the body parses as one.
pub fn check_response(request: &HttpRequest, response: &mut HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = response
        .read_body()
        .ok()
        .filter(|body| !body.is_empty())
        .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
        .and_then(|body| body.message);
    Err(api_error(request, response, message))
}

/// Build an `ApiError::Api` for `request` from the rejected response's
/// status and headers.
pub fn api_error(request: &HttpRequest, response: &HttpResponse, message: Option<String>) -> ApiError {
    ApiError::Api {
        status: response.status,
        method: request.method.to_string(),
        url: request.url.clone(),
        message,
        headers: response.headers.clone(),
    }
}
