//! Expansion of `#[derive(FormFields)]`.

use crate::parse::FieldAttrs;
use proc_macro2::{Ident, TokenStream, TokenTree};
use quote::{quote, ToTokens};
use syn::{
    ext::IdentExt, parse_quote, Data, DeriveInput, Field, Fields, Generics, Type, Visibility,
};

/// Expands the derive input into a `FormFields` impl.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.unraw().to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(unsupported(input, &type_name));
            }
        },
        Data::Enum(_) | Data::Union(_) => return Err(unsupported(input, &type_name)),
    };

    let type_params: Vec<&Ident> = input.generics.type_params().map(|p| &p.ident).collect();
    let mut generics = input.generics.clone();

    let mut writes = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some((write, bound)) = field_write(field, &type_name)? {
            if mentions_any(&field.ty, &type_params) {
                add_bound(&mut generics, &field.ty, &bound);
            }
            writes.push(write);
        }
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::stagehand::FormFields for #name #ty_generics #where_clause {
            fn write_form_fields(
                &self,
                fields: &mut ::stagehand::FormMap,
            ) -> ::core::result::Result<(), ::stagehand::FixtureError> {
                #(#writes)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn unsupported(input: &DeriveInput, type_name: &str) -> syn::Error {
    syn::Error::new_spanned(
        &input.ident,
        format!("unsupported type {type_name} for form flattening"),
    )
}

/// Trait a field's type must implement for the generated writes.
enum FieldBound {
    Value,
    Fields,
}

fn add_bound(generics: &mut Generics, ty: &Type, bound: &FieldBound) {
    let predicate = match bound {
        FieldBound::Value => parse_quote!(#ty: ::stagehand::FormValue),
        FieldBound::Fields => parse_quote!(#ty: ::stagehand::FormFields),
    };
    generics.make_where_clause().predicates.push(predicate);
}

/// Returns true if any of `params` appears in `ty`.
fn mentions_any(ty: &Type, params: &[&Ident]) -> bool {
    fn walk(tokens: TokenStream, params: &[&Ident]) -> bool {
        tokens.into_iter().any(|token| match token {
            TokenTree::Ident(ident) => params.iter().any(|p| **p == ident),
            TokenTree::Group(group) => walk(group.stream(), params),
            TokenTree::Punct(_) | TokenTree::Literal(_) => false,
        })
    }
    !params.is_empty() && walk(ty.to_token_stream(), params)
}

/// Generates the statements that write one field and the trait its type
/// needs, or `None` when it is skipped.
fn field_write(field: &Field, type_name: &str) -> syn::Result<Option<(TokenStream, FieldBound)>> {
    let attrs = FieldAttrs::from_attrs(&field.attrs)?;
    if attrs.skip {
        return Ok(None);
    }

    let Some(ident) = &field.ident else {
        return Ok(None);
    };

    if attrs.flatten {
        let write = quote! {
            ::stagehand::FormFields::write_form_fields(&self.#ident, fields)?;
        };
        return Ok(Some((write, FieldBound::Fields)));
    }

    if !matches!(field.vis, Visibility::Public(_)) {
        return Ok(None);
    }

    let field_name = ident.unraw().to_string();
    let key = attrs.rename.unwrap_or_else(|| field_name.clone());
    let path = format!("{type_name}.{field_name}");

    let write = quote! {
        match ::stagehand::FormValue::form_value(&self.#ident) {
            ::core::option::Option::Some(value) => {
                fields.insert(::std::string::String::from(#key), value);
            }
            ::core::option::Option::None => {
                return ::core::result::Result::Err(::stagehand::FixtureError::NilValue {
                    path: ::std::string::String::from(#path),
                });
            }
        }
    };
    Ok(Some((write, FieldBound::Value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_expand_renamed_and_plain_fields() {
        let input: DeriveInput = parse_quote! {
            pub struct Paging {
                #[form(rename = "page_size")]
                pub page_size: u32,
                pub name: String,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("impl :: stagehand :: FormFields for Paging"));
        assert!(output.contains("\"page_size\""));
        assert!(output.contains("\"name\""));
        assert!(output.contains("\"Paging.page_size\""));
    }

    #[test]
    fn test_private_fields_skipped() {
        let input: DeriveInput = parse_quote! {
            pub struct Login {
                pub user: String,
                secret: String,
                pub(crate) token: String,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("\"user\""));
        assert!(!output.contains("\"secret\""));
        assert!(!output.contains("\"token\""));
    }

    #[test]
    fn test_flatten_recurses_regardless_of_visibility() {
        let input: DeriveInput = parse_quote! {
            pub struct Search {
                #[form(flatten)]
                paging: Paging,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("write_form_fields (& self . paging , fields) ?"));
    }

    #[test]
    fn test_skip() {
        let input: DeriveInput = parse_quote! {
            pub struct Upload {
                #[form(skip)]
                pub checksum: [u8; 32],
                pub name: String,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(!output.contains("checksum"));
    }

    #[test]
    fn test_raw_identifier_unrawed() {
        let input: DeriveInput = parse_quote! {
            pub struct Filter {
                pub r#type: String,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("\"type\""));
        assert!(output.contains("\"Filter.type\""));
    }

    #[test]
    fn test_generics_forwarded() {
        let input: DeriveInput = parse_quote! {
            pub struct Wrapper<T: Clone> where T: Default {
                pub value: T,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("for Wrapper < T >"));
        assert!(output.contains("where T : Default , T : :: stagehand :: FormValue"));
    }

    #[test]
    fn test_generic_field_bounds() {
        let input: DeriveInput = parse_quote! {
            pub struct Page<P, V> {
                #[form(flatten)]
                pub paging: P,
                pub value: Option<V>,
                pub total: u64,
                #[form(skip)]
                pub marker: PhantomData<V>,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("P : :: stagehand :: FormFields"));
        assert!(output.contains("Option < V > : :: stagehand :: FormValue"));
        assert!(!output.contains("u64 : :: stagehand"));
        assert!(!output.contains("PhantomData < V > :"));
    }

    #[test]
    fn test_lifetime_only_generics_unbounded() {
        let input: DeriveInput = parse_quote! {
            pub struct Borrowed<'a> {
                pub name: &'a str,
            }
        };
        let output = expand(&input).unwrap().to_string();
        assert!(output.contains("for Borrowed < 'a >"));
        assert!(!output.contains("where"));
    }

    #[test]
    fn test_enum_rejected() {
        let input: DeriveInput = parse_quote! {
            pub enum Mode { Fast, Slow }
        };
        let err = expand(&input).unwrap_err();
        assert_eq!(err.to_string(), "unsupported type Mode for form flattening");
    }

    #[test]
    fn test_tuple_struct_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Id(pub u64);
        };
        assert!(expand(&input).is_err());
    }
}
