//! Authenticated request dispatch.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::navigator::Navigator;
use super::request::RequestDescriptor;
use crate::error::{DispatchError, Result};
use crate::session::SessionStore;

/// Successful outcome of a dispatch.
#[derive(Debug)]
pub enum Dispatched {
    /// The response declared a JSON content type and was decoded.
    Json(Value),
    /// Any other successful response, body unread.
    Raw(reqwest::Response),
}

impl Dispatched {
    /// Decode the outcome into `T`.
    ///
    /// Raw responses are read and parsed as JSON; an empty body decodes from
    /// `null`, so `()` and `Option<_>` targets accept it.
    pub async fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let value = match self {
            Self::Json(value) => value,
            Self::Raw(response) => {
                let text = response.text().await.map_err(DispatchError::network)?;
                if text.trim().is_empty() {
                    Value::Null
                } else {
                    serde_json::from_str(&text).map_err(DispatchError::network)?
                }
            }
        };
        serde_json::from_value(value).map_err(DispatchError::network)
    }

    /// The decoded JSON value, if the response was JSON.
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

/// The single choke point for outbound API calls.
///
/// Injects the bearer token from the [`SessionStore`], clears the session
/// and redirects to login on 401, and turns every failure into a
/// [`DispatchError`]. Never retries.
#[derive(Clone)]
pub struct Dispatcher {
    http: reqwest::Client,
    base_url: Option<Url>,
    session: Arc<SessionStore>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl Dispatcher {
    /// Create a dispatcher using `session` for tokens.
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            session,
            navigator: None,
        }
    }

    /// Resolve relative request URLs against `base_url`.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Install the login redirect for interactive use.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Issue one request.
    pub async fn dispatch(&self, request: RequestDescriptor) -> Result<Dispatched> {
        let RequestDescriptor {
            url,
            method,
            body,
            headers: extra,
            requires_auth,
        } = request;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &extra {
            headers.insert(name.clone(), value.clone());
        }

        if requires_auth {
            let Some(token) = self.session.get_token() else {
                warn!(%method, %url, "no session token, request not sent");
                self.redirect_to_login();
                return Err(DispatchError::no_token());
            };
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(DispatchError::network)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        self.send(method, &url, headers, body).await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Value>,
    ) -> Result<Dispatched> {
        let target = self.resolve(url)?;
        debug!(%method, url = %target, "dispatching request");

        let mut builder = self.http.request(method.clone(), target.clone()).headers(headers);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(&body).map_err(DispatchError::network)?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%method, url = %target, error = %e, "request failed");
            DispatchError::network(e)
        })?;

        let status = response.status();
        debug!(%method, url = %target, status = status.as_u16(), "response received");

        if status == StatusCode::UNAUTHORIZED {
            warn!(%method, url = %target, "API rejected session token");
            self.session.clear();
            self.redirect_to_login();
            return Err(DispatchError::unauthorized());
        }

        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            let err = DispatchError::from_response(status.as_u16(), body);
            debug!(status = err.status(), message = err.message(), "API returned an error");
            return Err(err);
        }

        if is_json(response.headers()) {
            let value = response
                .json::<Value>()
                .await
                .map_err(DispatchError::network)?;
            Ok(Dispatched::Json(value))
        } else {
            Ok(Dispatched::Raw(response))
        }
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => join_under(base, url),
                None => Err(DispatchError::network(format!(
                    "relative URL without a base URL: {url}"
                ))),
            },
            Err(e) => Err(DispatchError::network(e)),
        }
    }

    fn redirect_to_login(&self) {
        if let Some(navigator) = &self.navigator {
            navigator.redirect_to_login();
        }
    }

    pub async fn get(&self, url: &str) -> Result<Dispatched> {
        self.dispatch(RequestDescriptor::get(url)).await
    }

    pub async fn post<B: Serialize>(&self, url: &str, body: Option<&B>) -> Result<Dispatched> {
        self.dispatch(with_payload(RequestDescriptor::post(url), body)?).await
    }

    pub async fn patch<B: Serialize>(&self, url: &str, body: Option<&B>) -> Result<Dispatched> {
        self.dispatch(with_payload(RequestDescriptor::patch(url), body)?).await
    }

    pub async fn delete(&self, url: &str) -> Result<Dispatched> {
        self.dispatch(RequestDescriptor::delete(url)).await
    }

    /// Dispatch and decode the response into `T`.
    pub async fn dispatch_json<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T> {
        self.dispatch(request).await?.decode().await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get(url).await?.decode().await
    }

    pub async fn post_json<T, B>(&self, url: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.post(url, body).await?.decode().await
    }

    pub async fn patch_json<T, B>(&self, url: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.patch(url, body).await?.decode().await
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("session", &self.session)
            .field("navigator", &self.navigator.is_some())
            .finish()
    }
}

fn with_payload<B: Serialize>(
    request: RequestDescriptor,
    body: Option<&B>,
) -> Result<RequestDescriptor> {
    match body {
        Some(body) => {
            let value = serde_json::to_value(body).map_err(DispatchError::network)?;
            Ok(request.with_body(value))
        }
        None => Ok(request),
    }
}

/// Append `path` below `base`, keeping any path prefix `base` carries.
fn join_under(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(DispatchError::network)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(base: Option<&str>) -> Dispatcher {
        let d = Dispatcher::new(Arc::new(SessionStore::in_memory()));
        match base {
            Some(base) => d.with_base_url(Url::parse(base).unwrap()),
            None => d,
        }
    }

    #[test]
    fn test_resolve_relative() {
        let d = dispatcher(Some("http://localhost:4000"));
        let url = d.resolve("/api/leads").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/leads");
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let d = dispatcher(Some("http://localhost:4000/backend"));
        let url = d.resolve("/api/leads").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/backend/api/leads");

        let d = dispatcher(Some("http://localhost:4000/backend/"));
        let url = d.resolve("api/leads").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/backend/api/leads");
    }

    #[test]
    fn test_resolve_absolute_ignores_base() {
        let d = dispatcher(Some("http://localhost:4000"));
        let url = d.resolve("https://api.example.com/api/users").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/users");
    }

    #[test]
    fn test_resolve_relative_without_base() {
        let err = dispatcher(None).resolve("/api/leads").unwrap_err();
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn test_is_json() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }

    #[test]
    fn test_with_payload() {
        let req = with_payload(RequestDescriptor::post("/x"), Some(&vec![1, 2])).unwrap();
        assert_eq!(req.body.unwrap(), serde_json::json!([1, 2]));

        let req = with_payload::<()>(RequestDescriptor::post("/x"), None).unwrap();
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn test_no_token_fails_before_network() {
        // Port 9 on localhost is never reached: the token check comes first.
        let d = dispatcher(Some("http://127.0.0.1:9"));
        let err = d.get("/api/leads").await.unwrap_err();
        assert_eq!(err.status(), 401);
        assert_eq!(err.message(), "No authentication token");
    }

    #[tokio::test]
    async fn test_decode_json_variant() {
        let value: Vec<u32> = Dispatched::Json(serde_json::json!([1, 2, 3]))
            .decode()
            .await
            .unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }
}
