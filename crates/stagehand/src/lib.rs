//! # Stagehand
//!
//! Synthetic HTTP fixtures for unit-testing request handlers without a
//! network listener.
//!
//! A [`ContextBuilder`] collects the request: method, URL, headers, query
//! values, path parameters and one body (raw, JSON or a multipart form). It
//! then materializes an in-memory request plus an [`HttpResponse`] and adapts
//! the pair into the context a framework hands its handlers. The test calls
//! the handler with that context and inspects the response afterwards.
//!
//! ## Key Features
//!
//! - **Error-sticky builder**: the first failure is kept and reported by the
//!   terminal call
//! - **Struct flattening**: `#[derive(FormFields)]` turns structs into form fields
//! - **Write tracking**: [`HttpResponse`] records status, size and body the way
//!   framework writers report them
//! - **Two context shapes**: [`stagehand_mvc::Context`] with `:`-prefixed path
//!   parameters, [`stagehand_lite::Context`] with bare ones
//!
//! ## Example
//!
//! ```rust
//! use stagehand::{ContextBuilder, FormFields};
//! use http::StatusCode;
//!
//! #[derive(FormFields)]
//! pub struct Page {
//!     #[form(rename = "page_size")]
//!     pub page_size: u32,
//!     pub name: String,
//! }
//!
//! fn list_users(ctx: &mut stagehand_mvc::Context) {
//!     let size = ctx.input().query("page_size").unwrap_or_default();
//!     let id = ctx.input().param(":id").unwrap_or_default().to_string();
//!     ctx.output()
//!         .set_status(StatusCode::OK)
//!         .body(format!("{id}:{size}").as_bytes())
//!         .unwrap();
//! }
//!
//! let (response, mut ctx) = ContextBuilder::new()
//!     .set_method("POST")
//!     .add_path_param("id", 1)
//!     .add_form_struct(&Page { page_size: 15, name: "Jim".into() })
//!     .mvc_context()
//!     .unwrap();
//!
//! list_users(&mut ctx);
//!
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.text(), "1:15");
//! ```

#![doc(html_root_url = "https://docs.rs/stagehand/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate self as stagehand;

pub mod adapter;
mod builder;
pub mod config;
mod error;
mod form;
pub mod logging;
mod multipart;
mod params;
mod response;

pub use builder::{ContextBuilder, Fixture, DEFAULT_URL};
pub use config::{ConfigError, FixtureConfig};
pub use error::{FixtureError, FixtureResult};
pub use form::{FormFields, FormMap, FormValue};
pub use multipart::{FormEncoding, FORM_DATA_BOUNDARY, FORM_DATA_CONTENT_TYPE};
pub use params::{bare_key, prefixed_key, PathParams};
pub use response::{HttpResponse, NOT_WRITTEN};
pub use stagehand_http::{Request, RequestExt, ResponseWriter};
pub use stagehand_macros::FormFields;
