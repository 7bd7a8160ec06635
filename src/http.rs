//! HTTP transport boundary.
//!
//! The engine describes each exchange as an [`HttpRequest`] and hands it to a
//! [`Transport`]. Everything below that line (TLS, connection pooling,
//! redirects) belongs to the transport.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::TransportError;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP headers as ordered name/value pairs.
///
/// Names compare case-insensitively through [`header_get`] and
/// [`header_values`]; [`header_add`] appends and never replaces.
pub type HttpHeaders = Vec<(String, String)>;

/// One outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
    /// Accept invalid TLS certificates for this request.
    pub skip_verify: bool,
}

/// Status, headers and body received for an [`HttpRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }
}

/// Transport collaborator performing exactly one HTTP exchange per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Append a header, keeping any existing values for the same name.
pub fn header_add(headers: &mut HttpHeaders, name: &str, value: impl Into<String>) {
    headers.push((name.to_string(), value.into()));
}

/// First value of header `name` (case-insensitive).
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// All values of header `name` (case-insensitive), in insertion order.
#[must_use]
pub fn header_values<'a>(headers: &'a HttpHeaders, name: &str) -> Vec<&'a str> {
    headers
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
        .collect()
}

/// Transport backed by reqwest.
///
/// Holds one verifying and one non-verifying client and picks per request.
#[derive(Clone)]
pub struct ReqwestTransport {
    verified: reqwest::Client,
    insecure: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client_builder = || {
            let builder =
                reqwest::Client::builder().user_agent(crate::constants::headers::USER_AGENT);
            match timeout {
                Some(timeout) => builder.timeout(timeout),
                None => builder,
            }
        };

        let verified = client_builder().build()?;
        let insecure = client_builder().danger_accept_invalid_certs(true).build()?;

        Ok(Self { verified, insecure })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let client = if request.skip_verify {
            &self.insecure
        } else {
            &self.verified
        };

        let mut builder = client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let resp = builder.send().await?;

        let status = resp.status().as_u16();
        let headers: HttpHeaders = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = resp.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// In-memory transport for unit tests.
///
/// Responses are registered per method + URL and returned in FIFO order;
/// every request is recorded. Unregistered routes yield a transport error.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockTransportInner {
    routes: HashMap<(Method, String), VecDeque<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

#[cfg(test)]
impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(
        &self,
        method: Method,
        url: impl Into<String>,
        status: u16,
        body: &str,
    ) {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner
            .routes
            .entry((method, url.into()))
            .or_default()
            .push_back(HttpResponse {
                status,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: body.as_bytes().to_vec(),
            });
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.inner
            .lock()
            .expect("mock transport lock should not be poisoned")
            .requests
            .clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");

        let key = (request.method, request.url.clone());
        inner.requests.push(request);

        match inner.routes.get_mut(&key).and_then(|q| q.pop_front()) {
            Some(resp) => Ok(resp),
            None => Err(TransportError::Http(format!(
                "no mock response registered for {} {}",
                key.0, key.1
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_replays_and_records() {
        let transport = MockTransport::new();
        transport.push_response(Method::Get, "https://example.com/a", 200, "{}");

        let request = HttpRequest {
            method: Method::Get,
            url: "https://example.com/a".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            skip_verify: false,
        };
        let resp = transport.send(request.clone()).await.unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("content-type"), Some("application/json"));

        let err = transport.send(request.clone()).await.unwrap_err();
        assert!(err.to_string().contains("no mock response"));
        assert_eq!(transport.requests(), vec![request.clone(), request]);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let headers: HttpHeaders = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("accept".to_string(), "text/plain".to_string()),
        ];
        assert_eq!(header_get(&headers, "ACCEPT"), Some("application/json"));
        assert_eq!(
            header_values(&headers, "accept"),
            vec!["application/json", "text/plain"]
        );
        assert_eq!(header_get(&headers, "authorization"), None);
    }

    #[test]
    fn test_header_add_appends() {
        let mut headers = HttpHeaders::new();
        header_add(&mut headers, "X-Test", "1");
        header_add(&mut headers, "x-test", "2");
        assert_eq!(header_values(&headers, "X-TEST"), vec!["1", "2"]);
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_reqwest_transport_invalid_url_is_transport_error() {
        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .send(HttpRequest {
                method: Method::Get,
                url: "not a url".to_string(),
                headers: Vec::new(),
                body: Vec::new(),
                skip_verify: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Http(_) | TransportError::Client(_)
        ));
    }
}
