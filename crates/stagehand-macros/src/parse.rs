//! Parsing for `#[form(...)]` field attributes.

use syn::{spanned::Spanned, Attribute, LitStr};

/// Options declared on a single struct field.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldAttrs {
    /// Form key override.
    pub rename: Option<String>,
    /// Merge the nested struct's fields instead of encoding a value.
    pub flatten: bool,
    /// Leave the field out entirely.
    pub skip: bool,
}

impl FieldAttrs {
    /// Collects every `#[form(...)]` attribute on a field.
    ///
    /// Other attributes (`#[serde]`, doc comments, ...) are ignored.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("form")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    if parsed.rename.is_some() {
                        return Err(meta.error("duplicate `rename`"));
                    }
                    parsed.rename = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    parsed.flatten = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    Ok(())
                } else {
                    let name = meta
                        .path
                        .get_ident()
                        .map_or_else(|| "?".to_string(), ToString::to_string);
                    Err(meta.error(format!("unknown form attribute: {name}")))
                }
            })?;

            if parsed.flatten && parsed.rename.is_some() {
                return Err(syn::Error::new(
                    attr.span(),
                    "`rename` has no effect on a flattened field",
                ));
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, Data, DeriveInput, Fields};

    fn first_field_attrs(input: DeriveInput) -> syn::Result<FieldAttrs> {
        let Data::Struct(data) = input.data else {
            panic!("expected struct");
        };
        let Fields::Named(fields) = data.fields else {
            panic!("expected named fields");
        };
        FieldAttrs::from_attrs(&fields.named[0].attrs)
    }

    #[test]
    fn test_no_attributes() {
        let attrs = first_field_attrs(parse_quote! {
            struct Query { pub name: String }
        })
        .unwrap();
        assert_eq!(attrs, FieldAttrs::default());
    }

    #[test]
    fn test_rename() {
        let attrs = first_field_attrs(parse_quote! {
            struct Query {
                #[form(rename = "page_size")]
                pub page_size: u32,
            }
        })
        .unwrap();
        assert_eq!(attrs.rename.as_deref(), Some("page_size"));
        assert!(!attrs.flatten);
    }

    #[test]
    fn test_flatten_and_skip() {
        let attrs = first_field_attrs(parse_quote! {
            struct Query {
                #[serde(default)]
                #[form(flatten, skip)]
                pub paging: Paging,
            }
        })
        .unwrap();
        assert!(attrs.flatten);
        assert!(attrs.skip);
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let err = first_field_attrs(parse_quote! {
            struct Query {
                #[form(alias = "n")]
                pub name: String,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown form attribute: alias"));
    }

    #[test]
    fn test_flatten_with_rename_rejected() {
        let err = first_field_attrs(parse_quote! {
            struct Query {
                #[form(flatten, rename = "paging")]
                pub paging: Paging,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("flattened"));
    }

    #[test]
    fn test_duplicate_rename_rejected() {
        let result = first_field_attrs(parse_quote! {
            struct Query {
                #[form(rename = "a")]
                #[form(rename = "b")]
                pub name: String,
            }
        });
        assert!(result.is_err());
    }
}
