//! In-memory request construction and read helpers.

use crate::error::FormError;
use crate::form::{parse_form, FormData};
use bytes::Bytes;
use http::{header, HeaderValue, Method, Uri};

/// The in-memory request type handlers receive.
pub type Request = http::Request<Bytes>;

/// Builds an in-memory request from a method, URI and body.
///
/// When the URI is absolute its authority is copied into the `Host` header,
/// so handlers see the same host a real server would report.
///
/// # Example
///
/// ```rust
/// use stagehand_http::new_request;
/// use http::{Method, Uri};
///
/// let request = new_request(Method::POST, Uri::from_static("http://localhost/api"), "{}");
/// assert_eq!(request.method(), Method::POST);
/// assert_eq!(request.headers().get("host").unwrap(), "localhost");
/// ```
pub fn new_request(method: Method, uri: Uri, body: impl Into<Bytes>) -> Request {
    let mut request = http::Request::new(body.into());
    if let Some(host) = uri
        .authority()
        .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
    {
        request.headers_mut().insert(header::HOST, host);
    }
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    request
}

/// Read helpers for query and form values on a [`Request`].
pub trait RequestExt {
    /// Returns every value of a query parameter, in order.
    fn query_values(&self, key: &str) -> Vec<String>;

    /// Returns the first value of a query parameter.
    fn query_value(&self, key: &str) -> Option<String> {
        self.query_values(key).into_iter().next()
    }

    /// Returns the Content-Type header as a string.
    fn content_type(&self) -> Option<&str>;

    /// Parses the request body as urlencoded or multipart form data.
    fn form(&self) -> Result<FormData, FormError>;

    /// Returns the first form value for a key, looking at the body before the query.
    ///
    /// Body parse errors are ignored; a request without a readable form body
    /// still answers from its query string.
    fn form_value(&self, key: &str) -> Option<String> {
        self.form()
            .ok()
            .and_then(|form| form.value(key).map(str::to_string))
            .or_else(|| self.query_value(key))
    }
}

impl RequestExt for Request {
    fn query_values(&self, key: &str) -> Vec<String> {
        let Some(query) = self.uri().query() else {
            return Vec::new();
        };
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(k, _)| k == key)
                    .map(|(_, v)| v)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn content_type(&self) -> Option<&str> {
        self.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    fn form(&self) -> Result<FormData, FormError> {
        parse_form(self.headers(), self.body())
    }
}
