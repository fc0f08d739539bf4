//! The per-request context.

use crate::error::ContextError;
use crate::params::Params;
use http::{header, HeaderName, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stagehand_http::{Request, RequestExt, ResponseWriter};

/// Request context handed to lightweight router handlers.
///
/// All fields are public; routers assemble a context directly from the
/// request, the writer and the matched parameters.
pub struct Context {
    /// The incoming request.
    pub request: Request,
    /// Where the response goes.
    pub writer: Box<dyn ResponseWriter>,
    /// Matched path parameters.
    pub params: Params,
}

impl Context {
    /// Creates a context with no path parameters.
    pub fn new(request: Request, writer: Box<dyn ResponseWriter>) -> Self {
        Self {
            request,
            writer,
            params: Params::new(),
        }
    }

    /// Returns a path parameter by its bare name.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.by_name(key)
    }

    /// Returns the first query value for a key.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<String> {
        self.request.query_value(key)
    }

    /// Returns a value from the form body only.
    #[must_use]
    pub fn post_form(&self, key: &str) -> Option<String> {
        self.request
            .form()
            .ok()
            .and_then(|form| form.value(key).map(str::to_string))
    }

    /// Decodes the request body as JSON.
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        Ok(serde_json::from_slice(self.request.body())?)
    }

    /// Sets a response header.
    pub fn header(&mut self, name: &str, value: &str) -> Result<(), ContextError> {
        let header_name = HeaderName::try_from(name)
            .map_err(|e| ContextError::InvalidHeader(format!("{name}: {e}")))?;
        let header_value = HeaderValue::try_from(value)
            .map_err(|e| ContextError::InvalidHeader(format!("{name}: {e}")))?;
        self.writer.insert_header(header_name, header_value);
        Ok(())
    }

    /// Sends the status line without a body.
    pub fn status(&mut self, status: StatusCode) {
        self.writer.write_header(status);
    }

    /// Writes raw bytes with the given status and content type.
    pub fn data(
        &mut self,
        status: StatusCode,
        content_type: &'static str,
        content: &[u8],
    ) -> Result<(), ContextError> {
        if self.writer.header(header::CONTENT_TYPE.as_str()).is_none() {
            self.writer
                .insert_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        self.writer.write_header(status);
        self.writer.write(content)?;
        Ok(())
    }

    /// Writes a plain-text response.
    pub fn string(&mut self, status: StatusCode, content: &str) -> Result<(), ContextError> {
        self.data(status, "text/plain; charset=utf-8", content.as_bytes())
    }

    /// Writes a JSON response.
    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) -> Result<(), ContextError> {
        let content = serde_json::to_vec(value)?;
        self.data(status, "application/json; charset=utf-8", &content)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request", &self.request)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Param;
    use http::{Method, Uri};
    use stagehand_http::{new_request, ResponseRecorder};

    fn context(uri: &'static str, body: &'static str) -> Context {
        Context::new(
            new_request(Method::POST, Uri::from_static(uri), body),
            Box::new(ResponseRecorder::new()),
        )
    }

    #[test]
    fn test_param_lookup() {
        let mut ctx = context("/users/9", "");
        ctx.params.push(Param::new("id", "9"));

        assert_eq!(ctx.param("id"), Some("9"));
        assert_eq!(ctx.param(":id"), None);
    }

    #[test]
    fn test_query() {
        let ctx = context("/users?page=3", "");
        assert_eq!(ctx.query("page").as_deref(), Some("3"));
        assert_eq!(ctx.post_form("page"), None);
    }

    #[test]
    fn test_string_sets_content_type() {
        let mut ctx = context("/", "");
        ctx.string(StatusCode::OK, "success").unwrap();
        assert_eq!(
            ctx.writer.header("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_explicit_content_type_is_kept() {
        let mut ctx = context("/", "");
        ctx.header("content-type", "text/csv").unwrap();
        ctx.string(StatusCode::OK, "a,b").unwrap();
        assert_eq!(ctx.writer.header("content-type").unwrap(), "text/csv");
    }

    #[test]
    fn test_bind_json() {
        let ctx = context("/", r#"{"name":"Jim"}"#);
        let value: serde_json::Value = ctx.bind_json().unwrap();
        assert_eq!(value["name"], "Jim");
    }
}
