//! Request/response engine.
//!
//! [`Engine::execute`] owns exactly one HTTP exchange: it builds the URL and
//! headers from a [`Connection`], serializes the payload, sends the request
//! through the configured [`Transport`], and classifies the result into a
//! [`Response`]. Expected failures (bad status, malformed JSON, network
//! errors) are recorded on the response; `execute` never returns `Err`.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::connection::{Connection, Vendor};
use crate::constants::{self, paging};
use crate::endpoint::join_path;
use crate::errors::TransportError;
use crate::http::{
    HttpHeaders, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, header_add,
};
use crate::payload::{Payload, PayloadKind, Render, VendorError};

/// Ordered query parameters.
pub type Query = Vec<(String, String)>;

/// Page selection for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub per_page: u32,
    /// 1-based page index.
    pub page: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            per_page: paging::DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl ListOptions {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Query parameters using the vendor's page-size parameter name.
    pub fn query(&self, vendor: Vendor) -> Query {
        vec![
            (
                vendor.page_size_param().to_string(),
                self.per_page.min(paging::MAX_PAGE_SIZE).to_string(),
            ),
            (paging::PAGE_PARAM.to_string(), self.page.max(1).to_string()),
        ]
    }
}

/// Outcome of one [`Engine::execute`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub method: Method,
    pub url: String,
    /// Numeric status; `0` when no response was received.
    pub status: u16,
    /// Status code and reason phrase, e.g. `404 Not Found`.
    pub status_line: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
    /// Decoded payload; set only for 2xx responses that decoded cleanly.
    pub decoded: Option<Payload>,
    /// Vendor error object decoded from a non-2xx body.
    pub api_error: Option<VendorError>,
    /// Set when the request could not be built or sent.
    pub transport_error: Option<TransportError>,
    /// Diagnostic for a body that did not parse as expected. Never fatal.
    pub decode_error: Option<String>,
    /// Human-readable result.
    pub output: String,
}

impl Response {
    pub(crate) fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            status: 0,
            status_line: String::new(),
            headers: HttpHeaders::new(),
            body: Vec::new(),
            decoded: None,
            api_error: None,
            transport_error: None,
            decode_error: None,
            output: String::new(),
        }
    }

    fn failed(method: Method, url: String, error: TransportError) -> Self {
        let mut response = Self::new(method, url);
        response.output = error.to_string();
        response.transport_error = Some(error);
        response
    }

    /// True when the request was sent and answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        self.transport_error.is_none() && (200..300).contains(&self.status)
    }

    /// Raw body as (lossy) UTF-8 text.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Header value from the response (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::http::header_get(&self.headers, name)
    }
}

/// Single-round-trip request executor.
#[derive(Clone)]
pub struct Engine {
    transport: Arc<dyn Transport>,
}

impl Engine {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Engine backed by a default [`ReqwestTransport`].
    pub fn with_reqwest() -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(ReqwestTransport::new()?)))
    }

    /// Perform one HTTP exchange.
    ///
    /// `payload` is serialized as the body for non-GET methods and also names
    /// the shape expected back on success. GET requests never carry a body.
    pub async fn execute(
        &self,
        connection: &Connection,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        payload: &Payload,
    ) -> Response {
        let request = match build_request(connection, method, endpoint, query, payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(%method, endpoint, error = %err, "Failed to build request");
                return Response::failed(method, endpoint.to_string(), err);
            }
        };

        let url = request.url.clone();
        debug!(%method, url = %url, body_len = request.body.len(), "Sending request");

        match self.transport.send(request).await {
            Ok(http) => {
                debug!(%method, url = %url, status = http.status, "Received response");
                classify(method, url, http, payload.kind())
            }
            Err(err) => {
                warn!(%method, url = %url, error = %err, "Transport error");
                Response::failed(method, url, err)
            }
        }
    }
}

/// Build the request [`Engine::execute`] would send.
pub fn build_request(
    connection: &Connection,
    method: Method,
    endpoint: &str,
    query: &[(String, String)],
    payload: &Payload,
) -> Result<HttpRequest, TransportError> {
    let url = build_url(&connection.entrypoint, endpoint, query)?;

    let body = if method == Method::Get {
        Vec::new()
    } else {
        payload
            .to_body()
            .map_err(|e| TransportError::Serialize(e.to_string()))?
            .unwrap_or_default()
    };

    Ok(HttpRequest {
        method,
        url,
        headers: request_headers(connection),
        body,
        skip_verify: connection.skip_verify,
    })
}

/// Entrypoint joined with `endpoint`, plus the url-encoded query when non-empty.
pub fn build_url(
    entrypoint: &str,
    endpoint: &str,
    query: &[(String, String)],
) -> Result<String, TransportError> {
    let mut url = Url::parse(entrypoint).map_err(|e| TransportError::InvalidUrl {
        url: entrypoint.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(TransportError::InvalidUrl {
            url: entrypoint.to_string(),
            reason: "URL cannot carry a path".to_string(),
        });
    }

    let path = join_path(&[url.path(), endpoint]);
    url.set_path(&path);
    url.set_query(None);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url.to_string())
}

/// Vendor header set for `connection`.
///
/// `Authorization` is added only when the connection has a token.
pub fn request_headers(connection: &Connection) -> HttpHeaders {
    let mut headers = HttpHeaders::new();
    header_add(&mut headers, "Accept", connection.vendor.media_type());
    header_add(&mut headers, "Content-Type", constants::headers::CONTENT_TYPE_JSON);
    if connection.vendor == Vendor::Github {
        header_add(
            &mut headers,
            constants::headers::GITHUB_API_VERSION_HEADER,
            constants::headers::GITHUB_API_VERSION,
        );
    }
    if connection.has_token() {
        header_add(
            &mut headers,
            "Authorization",
            format!("{}{}", constants::headers::TOKEN_PREFIX, connection.token),
        );
    }
    headers
}

/// Status code with its canonical reason phrase.
pub fn status_line(status: u16) -> String {
    match reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
    {
        Some(reason) => format!("{} {}", status, reason),
        None => status.to_string(),
    }
}

fn classify(method: Method, url: String, http: HttpResponse, expect: PayloadKind) -> Response {
    let mut response = Response::new(method, url);
    response.status = http.status;
    response.status_line = status_line(http.status);
    response.headers = http.headers;
    response.body = http.body;

    let has_body = !response.body.iter().all(u8::is_ascii_whitespace);

    if response.is_success() {
        if expect == PayloadKind::None || !has_body {
            response.output = response.body_text();
            return response;
        }
        match expect.decode(&response.body) {
            Ok(payload) => {
                response.output = payload.render();
                response.decoded = Some(payload);
            }
            Err(err) => {
                warn!(url = %response.url, ?expect, error = %err, "Failed to decode response body");
                response.decode_error = Some(err.to_string());
                response.output = response.body_text();
            }
        }
        return response;
    }

    if !has_body {
        response.output = response.status_line.clone();
        return response;
    }

    match serde_json::from_slice::<VendorError>(&response.body) {
        Ok(api_error) => {
            response.output = api_error.render();
            response.api_error = Some(api_error);
        }
        Err(err) => {
            debug!(url = %response.url, error = %err, "Error body is not a vendor error object");
            response.decode_error = Some(err.to_string());
            response.output = response.body_text();
        }
    }
    response
}
