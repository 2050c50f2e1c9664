//! Derive macro for glimmer base configurations.
//!
//! This crate provides one derive macro, [`Params`], which lists the fields
//! of a base-configuration struct as ordered `(name, value)` pairs. It is
//! re-exported from the main `glimmer` crate; you don't need to add this
//! crate directly:
//!
//! ```ignore
//! use glimmer::prelude::*;
//!
//! #[derive(Clone, Params)]
//! struct RippleParams {
//!     ring_count: usize,
//!     max_radius: f32,
//!     #[param(nested)]
//!     spawn: SpawnPolicy,
//!     #[param(skip)]
//!     cache: Vec<f32>,
//! }
//! ```
//!
//! # Field attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | *(none)* | one entry, value converted with `Into<ParamValue>` |
//! | `#[param(nested)]` | the field's own `Params::entries` are spliced in |
//! | `#[param(skip)]` | the field is left out |
//! | `#[param(rename = "x")]` | entry is listed as `x` instead of the field name |
//!
//! Plain fields must have a type that converts into `ParamValue`
//! (numbers, `bool`, strings, `Vec<f32>` and `Option`s of those).
//! Fields are cloned before conversion, so non-`Copy` types work.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// How one field shows up in the generated `entries`.
enum FieldMode {
    Plain(String),
    Nested,
    Skip,
}

/// Derive `glimmer::Params` for a struct with named fields.
///
/// # Generated Items
///
/// For a struct `WaveParams`:
///
/// - `impl glimmer::Params for WaveParams` listing every field in
///   declaration order
///
/// # Example
///
/// ```ignore
/// #[derive(Params)]
/// struct WaveParams {
///     amplitude: f32,   // ("amplitude", Number(..))
///     #[param(rename = "rows")]
///     row_count: usize, // ("rows", Number(..))
/// }
/// ```
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to an enum or union
/// - Struct uses tuple fields instead of named fields
/// - A `#[param(...)]` attribute holds an unknown key
#[proc_macro_derive(Params, attributes(param))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Params derive only supports structs with named fields"),
        },
        _ => panic!("Params derive only supports structs"),
    };

    let mut pushes: Vec<proc_macro2::TokenStream> = Vec::new();
    for field in fields.iter() {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };

        match field_mode(field) {
            FieldMode::Skip => {}
            FieldMode::Nested => pushes.push(quote! {
                entries.extend(::glimmer::Params::entries(&self.#field_name));
            }),
            FieldMode::Plain(label) => pushes.push(quote! {
                entries.push((
                    #label,
                    ::core::convert::Into::<::glimmer::ParamValue>::into(::core::clone::Clone::clone(&self.#field_name)),
                ));
            }),
        }
    }

    let expanded = quote! {
        impl #impl_generics ::glimmer::Params for #name #ty_generics #where_clause {
            fn entries(&self) -> ::std::vec::Vec<(&'static str, ::glimmer::ParamValue)> {
                let mut entries = ::std::vec::Vec::new();
                #(#pushes)*
                entries
            }
        }
    };

    TokenStream::from(expanded)
}

fn field_mode(field: &syn::Field) -> FieldMode {
    let mut label = field.ident.as_ref().map(|i| i.to_string()).unwrap_or_default();
    let mut nested = false;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("param") {
            continue;
        }
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("nested") {
                nested = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                label = value.value();
                Ok(())
            } else {
                Err(meta.error("expected `nested`, `skip` or `rename = \"..\"`"))
            }
        });
        if let Err(e) = parsed {
            panic!("invalid #[param] attribute on `{}`: {}", label, e);
        }
    }

    if skip {
        FieldMode::Skip
    } else if nested {
        FieldMode::Nested
    } else {
        FieldMode::Plain(label)
    }
}
