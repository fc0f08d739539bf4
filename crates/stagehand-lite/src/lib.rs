//! # Stagehand Lite
//!
//! A lightweight router context. A [`Context`] is a plain value built from
//! the request, the response writer, and the [`Params`] the router matched.
//! Parameter keys are bare names: the `id` in `/user/:id` is read back with
//! `ctx.param("id")`.
//!
//! ## Example
//!
//! ```rust
//! use stagehand_http::{new_request, ResponseRecorder};
//! use stagehand_lite::{Context, Param};
//! use http::{Method, StatusCode, Uri};
//!
//! let mut ctx = Context::new(
//!     new_request(Method::GET, Uri::from_static("/user/7"), ""),
//!     Box::new(ResponseRecorder::new()),
//! );
//! ctx.params.push(Param::new("id", "7"));
//!
//! assert_eq!(ctx.param("id"), Some("7"));
//! ctx.string(StatusCode::OK, "hello").unwrap();
//! ```

#![doc(html_root_url = "https://docs.rs/stagehand-lite/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod params;

pub use context::Context;
pub use error::ContextError;
pub use params::{Param, Params};
