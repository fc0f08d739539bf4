//! Adapting built fixtures into framework contexts.
//!
//! Each framework gets its own function. The returned [`HttpResponse`] and the
//! writer inside the context are clones of one handle, so whatever the handler
//! writes through the context can be inspected on the response afterwards.

use crate::builder::Fixture;
use crate::response::HttpResponse;
use stagehand_lite::{Param, Params};

/// Builds an MVC-style context: a fresh context is reset with the response
/// and request, then each path parameter is set under its `:`-prefixed key.
pub fn mvc_context(fixture: Fixture) -> (HttpResponse, stagehand_mvc::Context) {
    let Fixture {
        request,
        response,
        params,
    } = fixture;

    let mut ctx = stagehand_mvc::Context::new();
    ctx.reset(response.clone(), request);
    for (key, value) in params.iter() {
        ctx.input_mut().set_param(key, value);
    }

    tracing::debug!(framework = "mvc", params = params.len(), "context adapted");
    (response, ctx)
}

/// Builds a lightweight router context with path parameters as bare
/// key/value pairs, in the order they were added.
pub fn lite_context(fixture: Fixture) -> (HttpResponse, stagehand_lite::Context) {
    let Fixture {
        request,
        response,
        params,
    } = fixture;

    let mut ctx = stagehand_lite::Context::new(request, Box::new(response.clone()));
    ctx.params = params
        .iter_bare()
        .map(|(key, value)| Param::new(key, value))
        .collect::<Params>();

    tracing::debug!(framework = "lite", params = params.len(), "context adapted");
    (response, ctx)
}
