//! `#[rest_controller]` implementation.

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, Attribute, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, Token,
    Type,
};

use crate::helpers::{parse_str_list, security_path};

const ROUTE_ATTRS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Route metadata collected from one handler's helper attributes.
struct HandlerAttrs {
    routes: Vec<(Ident, Vec<LitStr>)>,
    token_ignore: bool,
    overrides: Vec<LitStr>,
}

pub fn rest_controller_impl(attrs: TokenStream, input: TokenStream) -> TokenStream {
    let prefixes = match Punctuated::<LitStr, Token![,]>::parse_terminated.parse(attrs) {
        Ok(list) => list.into_iter().collect::<Vec<_>>(),
        Err(err) => return err.to_compile_error().into(),
    };
    let mut item_impl = parse_macro_input!(input as ItemImpl);

    match expand(&prefixes, &mut item_impl) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(
    prefixes: &[LitStr],
    item_impl: &mut ItemImpl,
) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[rest_controller] goes on an inherent impl block",
        ));
    }
    if !item_impl.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item_impl.generics,
            "#[rest_controller] does not support generic impl blocks",
        ));
    }

    let type_name = type_name(&item_impl.self_ty)?;
    let security = security_path();

    let mut routes = Vec::new();
    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let handler = take_handler_attrs(method)?;
        if handler.routes.is_empty() {
            continue;
        }
        check_handler_signature(method)?;

        let fn_name = &method.sig.ident;
        let fn_name_str = fn_name.to_string();
        let ignore = handler.token_ignore.then(|| quote! { .token_ignore() });
        let overrides = &handler.overrides;

        for (http_method, patterns) in &handler.routes {
            let first = &patterns[0];
            let rest = &patterns[1..];
            routes.push(quote! {
                .route(
                    #security::Route::#http_method(#first, Self::#fn_name)
                        #(.pattern(#rest))*
                        .named(#fn_name_str)
                        #ignore
                        #(.overrides(#overrides))*
                )
            });
        }
    }

    let request_mapping = (!prefixes.is_empty()).then(|| {
        quote! { .request_mapping([#(#prefixes),*]) }
    });
    let self_ty = &item_impl.self_ty;

    Ok(quote! {
        #item_impl

        impl #security::RestController for #self_ty {
            fn controller() -> #security::Controller {
                #security::Controller::new(#type_name)
                    #request_mapping
                    #(#routes)*
            }
        }
    })
}

fn type_name(ty: &Type) -> syn::Result<String> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.arguments.is_empty() {
                return Ok(segment.ident.to_string());
            }
        }
    }
    Err(syn::Error::new_spanned(
        ty,
        "#[rest_controller] expects a plain type name, e.g. `impl OpenController`",
    ))
}

/// Removes the helper attributes from `method` and returns what they said.
fn take_handler_attrs(method: &mut ImplItemFn) -> syn::Result<HandlerAttrs> {
    let mut handler = HandlerAttrs {
        routes: Vec::new(),
        token_ignore: false,
        overrides: Vec::new(),
    };
    let mut kept: Vec<Attribute> = Vec::new();

    for attr in method.attrs.drain(..) {
        let path = attr.path();

        if let Some(name) = ROUTE_ATTRS.iter().find(|name| path.is_ident(name)) {
            let patterns = parse_str_list(&attr)?;
            if patterns.is_empty() {
                return Err(syn::Error::new_spanned(
                    &attr,
                    format!(r#"expected at least one path, e.g. #[{}("/path")]"#, name),
                ));
            }
            handler.routes.push((Ident::new(name, Span::call_site()), patterns));
        } else if path.is_ident("token_ignore") {
            if !matches!(attr.meta, Meta::Path(_)) {
                return Err(syn::Error::new_spanned(
                    &attr,
                    "#[token_ignore] takes no arguments",
                ));
            }
            handler.token_ignore = true;
        } else if path.is_ident("overrides") {
            let parents = parse_str_list(&attr)?;
            if parents.is_empty() {
                return Err(syn::Error::new_spanned(
                    &attr,
                    r#"expected at least one method, e.g. #[overrides("Api::method")]"#,
                ));
            }
            handler.overrides.extend(parents);
        } else {
            kept.push(attr);
        }
    }
    method.attrs = kept;

    if handler.routes.is_empty() && (handler.token_ignore || !handler.overrides.is_empty()) {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "#[token_ignore] and #[overrides] need a route attribute such as #[get(\"/path\")]",
        ));
    }
    Ok(handler)
}

fn check_handler_signature(method: &ImplItemFn) -> syn::Result<()> {
    if let Some(FnArg::Receiver(receiver)) = method.sig.inputs.first() {
        return Err(syn::Error::new_spanned(
            receiver,
            "route handlers are associated functions and cannot take `self`",
        ));
    }
    if method.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &method.sig.fn_token,
            "route handlers must be `async fn`",
        ));
    }
    Ok(())
}
