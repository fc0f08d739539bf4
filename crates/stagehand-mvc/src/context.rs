//! The per-request context.

use crate::error::ContextError;
use crate::input::Input;
use crate::output::Output;
use http::StatusCode;
use stagehand_http::{Request, ResponseRecorder, ResponseWriter};

/// Request context handed to MVC-style handlers.
///
/// Contexts are meant to be pooled: [`new`](Context::new) allocates one with
/// placeholder request and writer, and [`reset`](Context::reset) rebinds it
/// to a real request/response pair before each use.
pub struct Context {
    input: Input,
    response_writer: Box<dyn ResponseWriter>,
    pending_status: Option<StatusCode>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context bound to an empty request and a throwaway recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            response_writer: Box::new(ResponseRecorder::new()),
            pending_status: None,
        }
    }

    /// Rebinds the context to a new request/response pair, clearing params.
    pub fn reset(&mut self, response_writer: impl ResponseWriter + 'static, request: Request) {
        self.input = Input::new(request);
        self.response_writer = Box::new(response_writer);
        self.pending_status = None;
    }

    /// Returns the underlying request.
    #[must_use]
    pub fn request(&self) -> &Request {
        self.input.request()
    }

    /// Returns the request-side view.
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Returns the request-side view mutably.
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// Returns the response-side helpers.
    pub fn output(&mut self) -> Output<'_> {
        Output::new(self.response_writer.as_mut(), &mut self.pending_status)
    }

    /// Returns the raw response writer.
    pub fn response_writer(&mut self) -> &mut dyn ResponseWriter {
        self.response_writer.as_mut()
    }

    /// Writes a string straight to the response body.
    pub fn write_string(&mut self, content: &str) -> Result<(), ContextError> {
        self.response_writer.write_str(content)?;
        Ok(())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("input", &self.input)
            .field("pending_status", &self.pending_status)
            .finish_non_exhaustive()
    }
}
