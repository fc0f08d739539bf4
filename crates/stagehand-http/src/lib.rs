//! # Stagehand HTTP
//!
//! In-memory HTTP primitives shared by Stagehand fixtures and the framework
//! contexts they are adapted into.
//!
//! ## Key Features
//!
//! - **Response Recording**: [`ResponseRecorder`] buffers status, headers and body
//! - **Writer Contract**: [`ResponseWriter`] is the narrow write/status/header
//!   surface handlers write through
//! - **Request Construction**: [`new_request`] builds an in-memory request
//! - **Form Reading**: [`RequestExt`] reads query and form values, including
//!   `multipart/form-data` bodies
//!
//! ## Example
//!
//! ```rust
//! use stagehand_http::{new_request, RequestExt, ResponseRecorder, ResponseWriter};
//! use http::{Method, StatusCode, Uri};
//!
//! let request = new_request(
//!     Method::GET,
//!     Uri::from_static("http://localhost/users?id=7"),
//!     "",
//! );
//! assert_eq!(request.query_value("id").as_deref(), Some("7"));
//!
//! let mut recorder = ResponseRecorder::new();
//! recorder.write_header(StatusCode::CREATED);
//! recorder.write(b"created").unwrap();
//! assert_eq!(recorder.status(), StatusCode::CREATED);
//! assert_eq!(recorder.body(), b"created");
//! ```

#![doc(html_root_url = "https://docs.rs/stagehand-http/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod form;
mod recorder;
mod request;
mod writer;

pub use error::FormError;
pub use form::{parse_form, FormData, UploadedFile};
pub use recorder::ResponseRecorder;
pub use request::{new_request, Request, RequestExt};
pub use writer::ResponseWriter;
