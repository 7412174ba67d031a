//! Outbound request descriptors.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;

/// Everything needed to issue one dispatch.
///
/// `url` may be absolute or relative to the dispatcher's base URL.
/// Authentication is required unless [`public`](Self::public) is called.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    pub requires_auth: bool,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` on `url`, with no body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            headers: HeaderMap::new(),
            requires_auth: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header. Caller headers override the dispatcher defaults.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Send without a bearer token.
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }
}
