//! Common helper functions for the controller macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Attribute, LitStr, Token};

/// Path of the security module in generated code.
pub fn security_path() -> TokenStream {
    quote! { ::actix_gate::http::security }
}

/// Parses `#[attr("a", "b")]` into its string literals.
pub fn parse_str_list(attr: &Attribute) -> syn::Result<Vec<LitStr>> {
    let list = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
    Ok(list.into_iter().collect())
}
