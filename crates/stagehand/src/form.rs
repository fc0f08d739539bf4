//! Flattening structured values into form fields.
//!
//! [`FormFields`] is implemented by `#[derive(FormFields)]` for structs with
//! named fields and by hand for [`serde_json::Value`] objects. Each field value
//! is rendered through [`FormValue`], which covers booleans, every integer
//! width and strings.

use crate::error::{FixtureError, FixtureResult};
use indexmap::IndexMap;
use std::rc::Rc;
use std::sync::Arc;

/// Flat form field map, in first-insertion order. A repeated key keeps its
/// original position and takes the last value written.
pub type FormMap = IndexMap<String, String>;

/// A scalar that can be written as a single form value.
///
/// `None` means there is no value to write. The flattener reports it as
/// [`FixtureError::NilValue`] instead of skipping the field.
pub trait FormValue {
    /// Renders the value as form text.
    fn form_value(&self) -> Option<String>;
}

macro_rules! impl_form_value_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FormValue for $ty {
                fn form_value(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_form_value_display!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, str, String,
);

impl<T: FormValue + ?Sized> FormValue for &T {
    fn form_value(&self) -> Option<String> {
        (**self).form_value()
    }
}

impl<T: FormValue + ?Sized> FormValue for Box<T> {
    fn form_value(&self) -> Option<String> {
        (**self).form_value()
    }
}

impl<T: FormValue + ?Sized> FormValue for Rc<T> {
    fn form_value(&self) -> Option<String> {
        (**self).form_value()
    }
}

impl<T: FormValue + ?Sized> FormValue for Arc<T> {
    fn form_value(&self) -> Option<String> {
        (**self).form_value()
    }
}

impl<T: FormValue> FormValue for Option<T> {
    fn form_value(&self) -> Option<String> {
        self.as_ref().and_then(FormValue::form_value)
    }
}

/// A struct-like value that flattens into form fields.
///
/// Usually derived:
///
/// ```rust
/// use stagehand::FormFields;
///
/// #[derive(FormFields)]
/// pub struct Paging {
///     #[form(rename = "page_size")]
///     pub page_size: u32,
/// }
///
/// #[derive(FormFields)]
/// pub struct Search {
///     #[form(flatten)]
///     pub paging: Paging,
///     pub name: String,
///     cursor: Option<u64>,
/// }
///
/// let search = Search {
///     paging: Paging { page_size: 15 },
///     name: "Jim".to_string(),
///     cursor: None,
/// };
///
/// let fields = search.form_fields().unwrap();
/// assert_eq!(fields.get("page_size").map(String::as_str), Some("15"));
/// assert_eq!(fields.get("name").map(String::as_str), Some("Jim"));
/// assert!(!fields.contains_key("cursor"));
/// # let _ = search.cursor;
/// ```
pub trait FormFields {
    /// Writes every field into `fields`, overwriting keys already present.
    fn write_form_fields(&self, fields: &mut FormMap) -> FixtureResult<()>;

    /// Flattens into a fresh map.
    fn form_fields(&self) -> FixtureResult<FormMap> {
        let mut fields = FormMap::new();
        self.write_form_fields(&mut fields)?;
        Ok(fields)
    }
}

impl<T: FormFields + ?Sized> FormFields for &T {
    fn write_form_fields(&self, fields: &mut FormMap) -> FixtureResult<()> {
        (**self).write_form_fields(fields)
    }
}

impl<T: FormFields + ?Sized> FormFields for Box<T> {
    fn write_form_fields(&self, fields: &mut FormMap) -> FixtureResult<()> {
        (**self).write_form_fields(fields)
    }
}

impl<T: FormFields + ?Sized> FormFields for Rc<T> {
    fn write_form_fields(&self, fields: &mut FormMap) -> FixtureResult<()> {
        (**self).write_form_fields(fields)
    }
}

impl<T: FormFields + ?Sized> FormFields for Arc<T> {
    fn write_form_fields(&self, fields: &mut FormMap) -> FixtureResult<()> {
        (**self).write_form_fields(fields)
    }
}

impl<T: FormFields> FormFields for Option<T> {
    fn write_form_fields(&self, fields: &mut FormMap) -> FixtureResult<()> {
        match self {
            Some(inner) => inner.write_form_fields(fields),
            None => Err(FixtureError::NilValue {
                path: short_type_name::<T>(),
            }),
        }
    }
}

/// Flattens a JSON object of scalars.
///
/// Floats, arrays and nested objects are rejected with
/// [`FixtureError::UnsupportedField`]; `null` is a [`FixtureError::NilValue`].
impl FormFields for serde_json::Value {
    fn write_form_fields(&self, fields: &mut FormMap) -> FixtureResult<()> {
        use serde_json::Value;

        let Value::Object(object) = self else {
            return Err(FixtureError::UnsupportedType {
                type_name: json_kind(self).to_string(),
            });
        };

        for (key, value) in object {
            let text = match value {
                Value::Bool(b) => b.to_string(),
                Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
                Value::String(s) => s.clone(),
                Value::Null => {
                    return Err(FixtureError::NilValue { path: key.clone() });
                }
                other => {
                    return Err(FixtureError::UnsupportedField {
                        field: key.clone(),
                        type_name: json_kind(other).to_string(),
                    });
                }
            };
            fields.insert(key.clone(), text);
        }

        Ok(())
    }
}

/// Type name with module paths removed, so `alloc::boxed::Box<app::User>`
/// becomes `Box<User>`.
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut path_start = 0;
    let mut rest = full;
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("::") {
            short.truncate(path_start);
            rest = tail;
            continue;
        }
        short.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            path_start = short.len();
        }
        rest = &rest[c.len_utf8()..];
    }
    short
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
