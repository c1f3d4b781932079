//! The `#[component]` attribute of `wirebox`.
//!
//! Annotating an `impl` block with `#[component]` implements
//! `wirebox::provider::component::Component` for its self type. The
//! function marked `#[inject]` becomes the constructor; each of its
//! parameters is resolved from the container:
//!
//! - a plain parameter by its type alone;
//! - `#[named("app.name")]` by its type and a string name;
//! - `#[qualified(expr)]` by its type and an arbitrary qualifier;
//! - with `#[default]` or `#[default(expr)]`, a parameter whose key isn't
//!   registered falls back to `Default::default()` or `expr`.
//!
//! Without an `#[inject]` function, the type is built with
//! `Default::default()`.

mod attrs;
mod impls;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::Result as SynResult;

#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    match component_impl(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn component_impl(attr: TokenStream2, item: TokenStream2) -> SynResult<TokenStream2> {
    let args = attrs::parse_component_args(attr)?;
    impls::expand_implementation(item, args)
}
