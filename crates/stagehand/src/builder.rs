//! The chainable fixture builder.

use crate::adapter;
use crate::config::FixtureConfig;
use crate::error::{FixtureError, FixtureResult};
use crate::form::FormFields;
use crate::multipart::{FormEncoding, FORM_DATA_CONTENT_TYPE};
use crate::params::PathParams;
use crate::response::HttpResponse;
use bytes::Bytes;
use http::uri::PathAndQuery;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use indexmap::IndexMap;
use serde::Serialize;
use stagehand_http::{new_request, Request};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// URL used when none is set.
pub const DEFAULT_URL: &str = "http://localhost/api/v1/test";

/// A built request, its response handle and the path parameters to inject.
#[derive(Debug)]
pub struct Fixture {
    /// The materialized request.
    pub request: Request,
    /// Unwritten response around a fresh recorder.
    pub response: HttpResponse,
    /// Path parameters, colon-prefixed, in insertion order.
    pub params: PathParams,
}

enum Body {
    Stream(Box<dyn Read + Send>),
    Json(Bytes),
    Form(FormEncoding),
}

impl Body {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Stream(_) => "stream",
            Self::Json(_) => "json",
            Self::Form(_) => "form",
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Json(bytes) => f.debug_tuple("Json").field(bytes).finish(),
            Self::Form(encoding) => f.debug_tuple("Form").field(encoding).finish(),
        }
    }
}

#[derive(Debug)]
struct Draft {
    method: Method,
    uri: Uri,
    params: PathParams,
    query: IndexMap<String, Vec<String>>,
    headers: HeaderMap,
    body: Option<Body>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static(DEFAULT_URL),
            params: PathParams::new(),
            query: IndexMap::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl Draft {
    fn set_body(&mut self, body: Body) -> FixtureResult<()> {
        if self.body.is_some() {
            return Err(FixtureError::DuplicateBody);
        }
        self.body = Some(body);
        Ok(())
    }

    /// Returns the form encoding, starting one if no body is set yet.
    fn form(&mut self) -> FixtureResult<&mut FormEncoding> {
        if self.body.is_none() {
            self.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(FORM_DATA_CONTENT_TYPE),
            );
            self.body = Some(Body::Form(FormEncoding::new()));
        }
        match &mut self.body {
            Some(Body::Form(encoding)) => Ok(encoding),
            _ => Err(FixtureError::DuplicateBody),
        }
    }

    fn write_field(&mut self, key: &str, value: &str) -> FixtureResult<()> {
        self.form()?
            .write_field(key, value)
            .map_err(|source| FixtureError::Encoding {
                field: key.to_string(),
                source,
            })
    }
}

enum BuilderState {
    Configuring(Box<Draft>),
    Failed(FixtureError),
}

/// Builds a request fixture and adapts it into a framework context.
///
/// Every configuration call is chainable. The first failing call puts the
/// builder into a failed state: later calls do nothing, and the terminal
/// call returns that first error.
///
/// Only one body representation is allowed. Form calls
/// ([`add_form`](Self::add_form), [`add_file`](Self::add_file),
/// [`add_form_struct`](Self::add_form_struct), ...) may be repeated and share
/// one `multipart/form-data` body; mixing them with
/// [`set_body`](Self::set_body) or [`set_json`](Self::set_json), or setting
/// either of those twice, fails with [`FixtureError::DuplicateBody`].
///
/// # Example
///
/// ```rust
/// use stagehand::ContextBuilder;
/// use http::StatusCode;
///
/// let (response, mut ctx) = ContextBuilder::new()
///     .set_method("POST")
///     .set_url("http://localhost/api/v1/user/:id")
///     .add_path_param("id", 1)
///     .set_json(&serde_json::json!({"name": "Jim"}))
///     .lite_context()
///     .unwrap();
///
/// assert_eq!(ctx.param("id"), Some("1"));
/// ctx.string(StatusCode::OK, "saved").unwrap();
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.text(), "saved");
/// ```
#[must_use]
pub struct ContextBuilder {
    state: BuilderState,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            BuilderState::Configuring(draft) => {
                f.debug_tuple("ContextBuilder").field(draft).finish()
            }
            BuilderState::Failed(err) => f
                .debug_struct("ContextBuilder")
                .field("error", err)
                .finish(),
        }
    }
}

impl ContextBuilder {
    /// Creates a builder for `GET` [`DEFAULT_URL`] with no body.
    pub fn new() -> Self {
        Self {
            state: BuilderState::Configuring(Box::default()),
        }
    }

    /// Creates a builder seeded from configuration.
    ///
    /// Invalid configured values fail the builder like the matching setters.
    pub fn with_config(config: &FixtureConfig) -> Self {
        Self::new()
            .set_method(&config.default_method)
            .set_url(&config.default_url)
            .set_headers(&config.default_headers)
    }

    /// Returns the error that failed the builder, if any.
    #[must_use]
    pub fn error(&self) -> Option<&FixtureError> {
        match &self.state {
            BuilderState::Configuring(_) => None,
            BuilderState::Failed(err) => Some(err),
        }
    }

    fn configure<F>(mut self, operation: &'static str, f: F) -> Self
    where
        F: FnOnce(&mut Draft) -> FixtureResult<()>,
    {
        if let BuilderState::Configuring(draft) = &mut self.state {
            if let Err(err) = f(&mut **draft) {
                tracing::warn!(operation, error = %err, "fixture builder failed");
                self.state = BuilderState::Failed(err);
            }
        }
        self
    }

    /// Sets the request method.
    pub fn set_method(self, method: impl AsRef<str>) -> Self {
        self.configure("set_method", |draft| {
            let method = method.as_ref();
            draft.method = Method::from_bytes(method.as_bytes())
                .map_err(|_| FixtureError::InvalidMethod(method.to_string()))?;
            Ok(())
        })
    }

    /// Sets the target URL. Query pairs already in it are kept.
    pub fn set_url(self, url: impl AsRef<str>) -> Self {
        self.configure("set_url", |draft| {
            let url = url.as_ref();
            draft.uri = Uri::try_from(url).map_err(|e| FixtureError::InvalidUri {
                uri: url.to_string(),
                reason: e.to_string(),
            })?;
            Ok(())
        })
    }

    /// Sets a request header, replacing an earlier value for the same name.
    pub fn set_header(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.configure("set_header", |draft| insert_header(draft, key.as_ref(), value.as_ref()))
    }

    /// Sets several request headers.
    pub fn set_headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.configure("set_headers", |draft| {
            headers
                .into_iter()
                .try_for_each(|(k, v)| insert_header(draft, k.as_ref(), v.as_ref()))
        })
    }

    /// Adds a path parameter. `id` and `:id` name the same parameter.
    pub fn add_path_param(self, key: impl AsRef<str>, value: impl fmt::Display) -> Self {
        self.configure("add_path_param", |draft| {
            draft.params.insert(key.as_ref(), value.to_string());
            Ok(())
        })
    }

    /// Adds several path parameters.
    pub fn add_path_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        self.configure("add_path_params", |draft| {
            for (key, value) in params {
                draft.params.insert(key.as_ref(), value.to_string());
            }
            Ok(())
        })
    }

    /// Appends a query value. Repeated keys keep every value in order.
    pub fn add_query(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configure("add_query", |draft| {
            draft.query.entry(key.into()).or_default().push(value.into());
            Ok(())
        })
    }

    /// Appends several query values.
    pub fn add_queries<I, K, V>(self, queries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.configure("add_queries", |draft| {
            for (key, value) in queries {
                draft.query.entry(key.into()).or_default().push(value.into());
            }
            Ok(())
        })
    }

    /// Adds a multipart form field.
    pub fn add_form(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.configure("add_form", |draft| draft.write_field(key.as_ref(), value.as_ref()))
    }

    /// Adds several multipart form fields.
    ///
    /// The multipart body is started even when `fields` is empty.
    pub fn add_forms<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.configure("add_forms", |draft| {
            draft.form()?;
            fields
                .into_iter()
                .try_for_each(|(k, v)| draft.write_field(k.as_ref(), v.as_ref()))
        })
    }

    /// Flattens `value` and adds its fields to the multipart form.
    pub fn add_form_struct<T: FormFields + ?Sized>(self, value: &T) -> Self {
        self.configure("add_form_struct", |draft| {
            let fields = value.form_fields()?;
            draft.form()?;
            fields
                .iter()
                .try_for_each(|(k, v)| draft.write_field(k, v))
        })
    }

    /// Adds a file part whose contents are read from `reader`.
    pub fn add_file(
        self,
        key: impl AsRef<str>,
        filename: impl AsRef<str>,
        mut reader: impl Read,
    ) -> Self {
        self.configure("add_file", |draft| {
            let key = key.as_ref();
            draft
                .form()?
                .write_file(key, filename.as_ref(), &mut reader)
                .map_err(|source| FixtureError::Encoding {
                    field: key.to_string(),
                    source,
                })?;
            Ok(())
        })
    }

    /// Adds a file part read from disk, named after the path's last component.
    ///
    /// The file is closed before this returns.
    pub fn add_file_path(self, key: impl AsRef<str>, path: impl AsRef<Path>) -> Self {
        self.configure("add_file_path", |draft| {
            let path = path.as_ref();
            let encoding = draft.form()?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut file = File::open(path)
                .map_err(|e| FixtureError::io(format!("open {}", path.display()), e))?;
            encoding
                .write_file(key.as_ref(), &filename, &mut file)
                .map_err(|e| FixtureError::io(format!("read {}", path.display()), e))?;
            Ok(())
        })
    }

    /// Uses `reader` as the raw request body. It is read when the fixture is built.
    pub fn set_body(self, reader: impl Read + Send + 'static) -> Self {
        self.configure("set_body", |draft| draft.set_body(Body::Stream(Box::new(reader))))
    }

    /// Uses `bytes` as the raw request body.
    pub fn set_body_bytes(self, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        self.configure("set_body_bytes", |draft| {
            draft.set_body(Body::Stream(Box::new(Cursor::new(bytes))))
        })
    }

    /// Serializes `value` as the JSON request body.
    pub fn set_json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        self.configure("set_json", |draft| {
            if draft.body.is_some() {
                return Err(FixtureError::DuplicateBody);
            }
            let json = serde_json::to_vec(value)?;
            draft.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            draft.set_body(Body::Json(Bytes::from(json)))
        })
    }

    /// Materializes the request and a fresh response.
    pub fn build(self) -> FixtureResult<Fixture> {
        let draft = match self.state {
            BuilderState::Configuring(draft) => *draft,
            BuilderState::Failed(err) => return Err(err),
        };
        let Draft {
            method,
            uri,
            params,
            query,
            headers,
            body,
        } = draft;

        let body_kind = body.as_ref().map_or("empty", Body::kind);
        let body = match body {
            None => Bytes::new(),
            Some(Body::Stream(mut reader)) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .map_err(|e| FixtureError::io("read request body", e))?;
                Bytes::from(buf)
            }
            Some(Body::Json(json)) => json,
            Some(Body::Form(mut encoding)) => {
                encoding.close().map_err(FixtureError::Close)?;
                encoding.into_bytes()
            }
        };

        let uri = merge_query(uri, &query)?;
        let mut request = new_request(method, uri, body);
        request.headers_mut().extend(headers);

        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            body = body_kind,
            params = params.len(),
            "fixture built"
        );

        Ok(Fixture {
            request,
            response: HttpResponse::new(),
            params,
        })
    }

    /// Builds the fixture and adapts it into an MVC-style context.
    pub fn mvc_context(self) -> FixtureResult<(HttpResponse, stagehand_mvc::Context)> {
        self.build().map(adapter::mvc_context)
    }

    /// Builds the fixture and adapts it into a lightweight router context.
    pub fn lite_context(self) -> FixtureResult<(HttpResponse, stagehand_lite::Context)> {
        self.build().map(adapter::lite_context)
    }
}

fn insert_header(draft: &mut Draft, key: &str, value: &str) -> FixtureResult<()> {
    let name = HeaderName::try_from(key)
        .map_err(|e| FixtureError::InvalidHeader(format!("{key}: {e}")))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| FixtureError::InvalidHeader(format!("{key}: {e}")))?;
    draft.headers.insert(name, value);
    Ok(())
}

/// Appends `extra` to the URL's query.
///
/// The result is re-encoded sorted by key; for each key the URL's own values
/// come first. The URL is returned untouched when there is nothing to add.
fn merge_query(uri: Uri, extra: &IndexMap<String, Vec<String>>) -> FixtureResult<Uri> {
    if extra.is_empty() {
        return Ok(uri);
    }

    let invalid = |uri: &Uri, reason: String| FixtureError::InvalidUri {
        uri: uri.to_string(),
        reason,
    };

    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(query) = uri.query() {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query).map_err(|e| invalid(&uri, e.to_string()))?;
        for (key, value) in pairs {
            merged.entry(key).or_default().push(value);
        }
    }
    for (key, values) in extra {
        merged
            .entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }

    let pairs: Vec<(&str, &str)> = merged
        .iter()
        .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
        .collect();
    let query = serde_urlencoded::to_string(&pairs).map_err(|e| invalid(&uri, e.to_string()))?;

    let path = uri.path().to_string();
    let path_and_query = PathAndQuery::try_from(format!("{path}?{query}"))
        .map_err(|e| invalid(&uri, e.to_string()))?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).map_err(|e| invalid(&uri, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_http::RequestExt;

    #[test]
    fn test_defaults() {
        let fixture = ContextBuilder::new().build().unwrap();
        assert_eq!(fixture.request.method(), Method::GET);
        assert_eq!(fixture.request.uri(), DEFAULT_URL);
        assert_eq!(fixture.request.headers()["host"], "localhost");
        assert!(fixture.request.body().is_empty());
        assert!(!fixture.response.written());
    }

    #[test]
    fn test_headers_replace() {
        let fixture = ContextBuilder::new()
            .set_header("X-Token", "a")
            .set_headers([("x-token", "b"), ("Accept", "text/plain")])
            .build()
            .unwrap();
        let headers = fixture.request.headers();
        assert_eq!(headers.get_all("x-token").iter().count(), 1);
        assert_eq!(headers["x-token"], "b");
        assert_eq!(headers["accept"], "text/plain");
    }

    #[test]
    fn test_raw_body() {
        let fixture = ContextBuilder::new()
            .set_method("PUT")
            .set_header("Content-Type", "text/plain")
            .set_body(Cursor::new(b"raw payload".to_vec()))
            .build()
            .unwrap();
        assert_eq!(fixture.request.method(), Method::PUT);
        assert_eq!(fixture.request.body(), "raw payload");
        assert_eq!(fixture.request.content_type(), Some("text/plain"));
    }

    #[test]
    fn test_json_body() {
        let fixture = ContextBuilder::new()
            .set_json(&serde_json::json!({"name": "Jim"}))
            .build()
            .unwrap();
        assert_eq!(fixture.request.content_type(), Some("application/json"));
        assert_eq!(fixture.request.body(), r#"{"name":"Jim"}"#);
    }

    #[test]
    fn test_multiple_form_calls_share_body() {
        let fixture = ContextBuilder::new()
            .set_method("POST")
            .add_form("a", "1")
            .add_forms([("b", "2")])
            .add_file("f", "f.txt", &b"file"[..])
            .build()
            .unwrap();
        assert_eq!(fixture.request.content_type(), Some(FORM_DATA_CONTENT_TYPE));

        let form = fixture.request.form().unwrap();
        assert_eq!(form.value("a"), Some("1"));
        assert_eq!(form.value("b"), Some("2"));
        assert_eq!(&form.file("f").unwrap().data[..], b"file");
    }

    #[test]
    fn test_empty_forms_still_start_body() {
        let fixture = ContextBuilder::new()
            .add_forms(Vec::<(&str, &str)>::new())
            .build()
            .unwrap();
        assert_eq!(fixture.request.body(), "\r\n--------HttpTest--\r\n");
        assert!(fixture.request.form().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_body_is_sticky() {
        let builder = ContextBuilder::new()
            .set_body_bytes("first")
            .set_json(&1)
            .set_url("http://localhost/other")
            .add_form("late", "value");
        assert!(builder.error().is_some_and(FixtureError::is_duplicate_body));
        assert!(matches!(builder.build(), Err(FixtureError::DuplicateBody)));
    }

    #[test]
    fn test_form_then_raw_body_fails() {
        let result = ContextBuilder::new()
            .add_form("a", "1")
            .set_body_bytes("raw")
            .build();
        assert!(matches!(result, Err(FixtureError::DuplicateBody)));
    }

    #[test]
    fn test_first_error_wins() {
        let result = ContextBuilder::new()
            .set_method("BAD METHOD")
            .set_url("not a url\n")
            .build();
        assert!(matches!(result, Err(FixtureError::InvalidMethod(m)) if m == "BAD METHOD"));
    }

    #[test]
    fn test_invalid_header() {
        let result = ContextBuilder::new().set_header("bad header", "x").build();
        assert!(matches!(result, Err(FixtureError::InvalidHeader(_))));
    }

    #[test]
    fn test_query_merge() {
        let fixture = ContextBuilder::new()
            .set_url("http://localhost/search?tag=x&b=1")
            .add_query("tag", "y")
            .add_queries([("a", "0"), ("tag", "z")])
            .build()
            .unwrap();
        assert_eq!(fixture.request.uri().query(), Some("a=0&b=1&tag=x&tag=y&tag=z"));
        assert_eq!(fixture.request.query_values("tag"), ["x", "y", "z"]);
    }

    #[test]
    fn test_query_untouched_without_additions() {
        let fixture = ContextBuilder::new()
            .set_url("http://localhost/search?b=2&a=1")
            .build()
            .unwrap();
        assert_eq!(fixture.request.uri().query(), Some("b=2&a=1"));
    }

    #[test]
    fn test_query_on_relative_url() {
        let fixture = ContextBuilder::new()
            .set_url("/users")
            .add_query("q", "a b")
            .build()
            .unwrap();
        assert_eq!(fixture.request.uri(), "/users?q=a+b");
        assert_eq!(fixture.request.query_value("q").as_deref(), Some("a b"));
    }

    #[test]
    fn test_path_params_normalized() {
        let fixture = ContextBuilder::new()
            .add_path_param("id", 1)
            .add_path_params([(":id", 2), ("page", 3)])
            .build()
            .unwrap();
        let params: Vec<_> = fixture.params.iter().collect();
        assert_eq!(params, [(":id", "2"), (":page", "3")]);
    }

    #[test]
    fn test_stream_read_error() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("boom"))
            }
        }

        let result = ContextBuilder::new().set_body(Broken).build();
        assert!(matches!(result, Err(FixtureError::Io { .. })));
    }

    #[test]
    fn test_file_reader_error() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("boom"))
            }
        }

        let result = ContextBuilder::new().add_file("upload", "a.bin", Broken).build();
        assert!(matches!(result, Err(FixtureError::Encoding { field, .. }) if field == "upload"));
    }

    #[test]
    fn test_missing_file_path() {
        let result = ContextBuilder::new()
            .add_file_path("upload", "/definitely/not/here.txt")
            .build();
        assert!(matches!(result, Err(FixtureError::Io { .. })));
    }

    #[test]
    fn test_with_config() {
        let config = FixtureConfig {
            default_method: "DELETE".to_string(),
            default_url: "http://example.test/items/9".to_string(),
            default_headers: [("x-token".to_string(), "secret".to_string())]
                .into_iter()
                .collect(),
        };
        let fixture = ContextBuilder::with_config(&config).build().unwrap();
        assert_eq!(fixture.request.method(), Method::DELETE);
        assert_eq!(fixture.request.uri().path(), "/items/9");
        assert_eq!(fixture.request.headers()["x-token"], "secret");
        assert_eq!(fixture.request.headers()["host"], "example.test");
    }
}
