//! Request-side view of a context.

use crate::error::ContextError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use stagehand_http::{Request, RequestExt};

/// The request and the path parameters resolved for it.
#[derive(Debug, Default)]
pub struct Input {
    request: Request,
    params: IndexMap<String, String>,
}

impl Input {
    pub(crate) fn new(request: Request) -> Self {
        Self {
            request,
            params: IndexMap::new(),
        }
    }

    /// Returns the underlying request.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns a path parameter by its route key, e.g. `":id"`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Sets a path parameter. The key is stored exactly as given.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Returns all path parameters in the order they were set.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a form or query value, preferring the body.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<String> {
        self.request.form_value(key)
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        self.request.body()
    }

    /// Returns a request header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Decodes the request body as JSON.
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        Ok(serde_json::from_slice(self.request.body())?)
    }
}
