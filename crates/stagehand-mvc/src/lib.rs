//! # Stagehand MVC
//!
//! An MVC-style request context. A [`Context`] is allocated once and
//! [`reset`](Context::reset) for each request; request-side data lives in
//! [`Input`] and response-side helpers in [`Output`].
//!
//! Path parameters are keyed with a leading colon, mirroring the route
//! template they came from: the `id` in `/user/:id` is read back with
//! `ctx.input().param(":id")`.
//!
//! ## Example
//!
//! ```rust
//! use stagehand_http::{new_request, ResponseRecorder};
//! use stagehand_mvc::Context;
//! use http::{Method, Uri};
//!
//! let mut ctx = Context::new();
//! ctx.reset(
//!     ResponseRecorder::new(),
//!     new_request(Method::GET, Uri::from_static("/user/7"), ""),
//! );
//! ctx.input_mut().set_param(":id", "7");
//!
//! assert_eq!(ctx.input().param(":id"), Some("7"));
//! ctx.write_string("ok").unwrap();
//! ```

#![doc(html_root_url = "https://docs.rs/stagehand-mvc/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod input;
mod output;

pub use context::Context;
pub use error::ContextError;
pub use input::Input;
pub use output::Output;
