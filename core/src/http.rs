//! HTTP request and response values exchanged with the transport.
//!
//! # Design
//! `HttpRequest` is plain data: the pipeline builds it, a `Transport`
//! executes it. `HttpResponse` owns its body as a reader so the dispatcher
//! can hand the stream to a checker or decoder; the stream is released when
//! the response is dropped, which happens exactly once per dispatch.

use std::fmt;
use std::io::{self, Cursor, Read};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `Pipeline::new_request`. `url` is already resolved against the
/// client's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Set `name` to `value`, replacing any existing header with the same
    /// name regardless of case.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }
}

/// An HTTP response as returned by a `Transport`.
///
/// The body is an owned stream. Whoever holds the response may read it;
/// dropping the response releases it.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Box<dyn Read + Send>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    /// Response with an in-memory body and no headers.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, Vec::new(), Cursor::new(body.into()))
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Read the remaining body into memory.
    pub fn read_body(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.body.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Discard whatever is left of the body.
    pub fn drain(&mut self) -> io::Result<u64> {
        io::copy(&mut self.body, &mut io::sink())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// A successfully checked response: status line, headers, and the decoded
/// body (`()` when the caller asked for no body).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: T,
}

impl<T> ApiResponse<T> {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn into_body(self) -> T {
        self.body
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.example.com/v1/".to_string(),
            headers: vec![("User-Agent".to_string(), "bone".to_string())],
            body: None,
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request();
        assert_eq!(req.header("user-agent"), Some("bone"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn set_header_replaces_existing_value() {
        let mut req = request();
        req.set_header("user-agent", "custom/1.0");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("User-Agent"), Some("custom/1.0"));
    }

    #[test]
    fn response_success_range_is_inclusive() {
        assert!(HttpResponse::from_bytes(200, "").is_success());
        assert!(HttpResponse::from_bytes(299, "").is_success());
        assert!(!HttpResponse::from_bytes(199, "").is_success());
        assert!(!HttpResponse::from_bytes(300, "").is_success());
    }

    #[test]
    fn read_body_consumes_stream() {
        let mut resp = HttpResponse::from_bytes(200, "hello");
        assert_eq!(resp.read_body().unwrap(), b"hello");
        assert_eq!(resp.drain().unwrap(), 0);
    }

    #[test]
    fn method_display_is_uppercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Get.as_str(), "GET");
    }
}
