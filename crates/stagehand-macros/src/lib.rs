//! Procedural macros for Stagehand fixtures.
//!
//! `#[derive(FormFields)]` turns a struct with named fields into a flat set
//! of form fields that a request builder can encode as `multipart/form-data`.
//!
//! # Example
//!
//! ```rust,ignore
//! use stagehand::FormFields;
//!
//! #[derive(FormFields)]
//! pub struct Paging {
//!     #[form(rename = "page_size")]
//!     pub page_size: u32,
//!     #[form(rename = "page_num")]
//!     pub page_num: u32,
//! }
//!
//! #[derive(FormFields)]
//! pub struct Search {
//!     #[form(flatten)]
//!     pub paging: Paging,
//!     pub name: String,
//!     internal_id: u64, // not `pub`, never encoded
//! }
//! ```
//!
//! # Field Rules
//!
//! - Only `pub` fields are encoded; private fields are skipped
//! - `#[form(rename = "key")]` overrides the field name used as the form key
//! - `#[form(flatten)]` merges a nested struct's fields into the same map
//! - `#[form(skip)]` excludes a `pub` field
//! - Field types must implement `stagehand::FormValue`; anything else is a
//!   compile error unless skipped
//! - A `None` value (at any depth) fails with `FixtureError::NilValue`

mod form_fields;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `stagehand::FormFields` for a struct with named fields.
///
/// Enums, unions and tuple structs are rejected at compile time.
///
/// # Generated Code
///
/// The derive generates approximately:
///
/// ```rust,ignore
/// impl ::stagehand::FormFields for Search {
///     fn write_form_fields(
///         &self,
///         fields: &mut ::stagehand::FormMap,
///     ) -> Result<(), ::stagehand::FixtureError> {
///         ::stagehand::FormFields::write_form_fields(&self.paging, fields)?;
///         match ::stagehand::FormValue::form_value(&self.name) {
///             Some(value) => { fields.insert("name".to_owned(), value); }
///             None => return Err(::stagehand::FixtureError::NilValue { path: "Search.name".to_owned() }),
///         }
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_derive(FormFields, attributes(form))]
pub fn derive_form_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    form_fields::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
