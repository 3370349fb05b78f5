//! Procedural macros for declaring routes and their authentication markers.
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `#[rest_controller("/prefix", ...)]` | Class-level prefixes of an `impl` block |
//! | `#[get("/path", ...)]`, `#[post]`, `#[put]`, `#[delete]`, `#[patch]` | Method patterns |
//! | `#[token_ignore]` | Exempt the handler from authentication |
//! | `#[overrides("Api::method", ...)]` | Inherit markers from interface methods |
//!
//! # Usage
//!
//! ```ignore
//! use actix_gate::rest_controller;
//! use actix_web::{HttpResponse, Responder};
//!
//! pub struct PingController;
//!
//! #[rest_controller("/v1", "/v2")]
//! impl PingController {
//!     #[token_ignore]
//!     #[get("/ping")]
//!     async fn ping() -> impl Responder {
//!         HttpResponse::Ok().body("pong")
//!     }
//! }
//!
//! let routes = RouteTable::builder()
//!     .rest_controller::<PingController>()
//!     .build();
//! ```

use proc_macro::TokenStream;

mod controller;
mod helpers;

/// Turns an inherent `impl` block into a route controller.
///
/// The attribute arguments are the class-level prefixes; every route of the
/// block is mounted under each of them. The helper attributes on the
/// methods are consumed by this macro and generate an
/// `impl RestController for Type`.
///
/// Methods without a route attribute are left untouched.
#[proc_macro_attribute]
pub fn rest_controller(attrs: TokenStream, input: TokenStream) -> TokenStream {
    controller::rest_controller_impl(attrs, input)
}
