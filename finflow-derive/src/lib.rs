use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{parse_macro_input, token, Data, DeriveInput, Fields, Lit, LitStr, Meta, Token, Type};

/// Derive macro describing the CSV columns a row struct serializes to.
///
/// For each named field the generated table records:
/// - the column name (honours `#[serde(rename = "...")]`)
/// - whether the column is always populated (`Option<T>` fields and fields
///   with `skip_serializing_if` are optional)
/// - the field's doc comment, used as the column description
///
/// Generates `csv_columns() -> &'static [CsvColumn]` and `csv_header()`.
/// `CsvColumn` must be in scope where the derive is used.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvSchema requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvSchema only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut columns = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = match serde_attrs(&field.attrs) {
            Ok(attrs) => attrs,
            Err(err) => return err.to_compile_error().into(),
        };
        let column = attrs.rename.unwrap_or_else(|| ident.to_string());
        let required = !attrs.skippable && !is_option_type(&field.ty);
        let description = doc_comment(&field.attrs);
        columns.push((column, required, description));
    }

    let entries = columns.iter().map(|(column, required, description)| {
        quote! {
            CsvColumn {
                name: #column,
                required: #required,
                description: #description,
            }
        }
    });
    let header = columns
        .iter()
        .map(|(column, _, _)| column.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let expanded = quote! {
        impl #name {
            pub fn csv_columns() -> &'static [CsvColumn] {
                static COLUMNS: &[CsvColumn] = &[
                    #(#entries),*
                ];
                COLUMNS
            }

            pub fn csv_header() -> &'static str {
                #header
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    skippable: bool,
}

fn serde_attrs(attrs: &[syn::Attribute]) -> syn::Result<SerdeAttrs> {
    let mut out = SerdeAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(token::Paren) {
                // rename(serialize = "..", deserialize = "..")
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("serialize") {
                        let value: LitStr = inner.value()?.parse()?;
                        out.rename = Some(value.value());
                        Ok(())
                    } else {
                        skip_meta(inner)
                    }
                })
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                out.rename = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("skip_serializing_if") {
                let _: LitStr = meta.value()?.parse()?;
                out.skippable = true;
                Ok(())
            } else {
                skip_meta(meta)
            }
        })?;
    }
    Ok(out)
}

/// Consume a serde key we don't use, in `key`, `key = ".."` or `key(..)` form.
fn skip_meta(meta: ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Lit = meta.value()?.parse()?;
    } else if meta.input.peek(token::Paren) {
        meta.parse_nested_meta(skip_meta)?;
    }
    Ok(())
}

/// Joined `///` lines of a field
fn doc_comment(attrs: &[syn::Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        let Meta::NameValue(doc) = &attr.meta else {
            continue;
        };
        if !doc.path.is_ident("doc") {
            continue;
        }
        if let syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(text),
            ..
        }) = &doc.value
        {
            lines.push(text.value().trim().to_string());
        }
    }
    lines.join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Path(path) if path.qself.is_none()
            && path.path.segments.last().is_some_and(|s| s.ident == "Option")
    )
}
