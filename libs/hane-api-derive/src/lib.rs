use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro exposing a struct's named fields as entity attributes.
///
/// Generates `impl hane_api::Entity` with:
///
/// - `attributes() -> Fields` — every exposed field, in declaration order.
/// - `attribute(&str) -> Option<Value>` — a single field by exposed name.
///
/// Field values are converted with `serde_json::to_value`, so every exposed
/// field type must implement `Serialize`. A field that fails to serialize
/// (a map with non-string keys, say) is reported as `null`, so it still
/// counts as present but can never serve as a collection key.
///
/// # Example
///
/// ```ignore
/// #[derive(Entity)]
/// pub struct User {
///     pub id: u64,
///     #[entity(rename = "display_name")]
///     pub name: String,
///     #[entity(skip)]
///     pub password_hash: String,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Entity only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Entity only supports structs",
            ))
        }
    };

    let mut insert_tokens = Vec::new();
    let mut match_tokens = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;

        // Parse #[entity(...)] attribute.
        let mut rename: Option<String> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown entity attribute (expected 'rename' or 'skip')"))
                }
            })?;
        }

        if skip {
            continue;
        }

        let exposed = rename.unwrap_or_else(|| unraw(&field_name.to_string()));

        let value = quote! {
            ::hane_api::__private::serde_json::to_value(&self.#field_name)
                .unwrap_or(::hane_api::value::Value::Null)
        };

        insert_tokens.push(quote! {
            __fields.insert(::std::string::String::from(#exposed), #value);
        });

        match_tokens.push(quote! {
            #exposed => ::std::option::Option::Some(#value),
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::hane_api::entity::Entity for #name #ty_generics #where_clause {
            fn attributes(&self) -> ::hane_api::value::Fields {
                let mut __fields = ::hane_api::value::Fields::new();
                #(#insert_tokens)*
                __fields
            }

            fn attribute(&self, __name: &str) -> ::std::option::Option<::hane_api::value::Value> {
                match __name {
                    #(#match_tokens)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

/// Strip the `r#` prefix from raw identifiers (`r#type` is exposed as `type`).
fn unraw(ident: &str) -> String {
    ident.strip_prefix("r#").unwrap_or(ident).to_string()
}
