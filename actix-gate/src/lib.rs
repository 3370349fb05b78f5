//! # Actix Gate
//!
//! Route-driven authentication exemptions for Actix Web.
//!
//! This crate combines:
//! - `actix-gate-core`: route table, exemption resolver, request gate and middleware
//! - `actix-gate-codegen`: the `#[rest_controller]` macro
//!
//! ## Example
//!
//! ```rust,ignore
//! use actix_gate::prelude::*;
//! use actix_web::{App, HttpResponse, HttpServer, Responder};
//!
//! pub struct OpenController;
//!
//! #[rest_controller("/admin/base/open")]
//! impl OpenController {
//!     #[token_ignore]
//!     #[post("/login")]
//!     async fn login() -> impl Responder {
//!         HttpResponse::Ok().body("token")
//!     }
//! }
//!
//! let routes = RouteTable::builder()
//!     .rest_controller::<OpenController>()
//!     .build();
//! let exemptions = AuthorizationManager::exemptions(&SecurityProperties::new(), &routes)?;
//!
//! HttpServer::new(move || {
//!     let routes = routes.clone();
//!     App::new()
//!         .wrap(
//!             SecurityTransform::new()
//!                 .config_authenticator(MyTokenFilter)
//!                 .config_authorizer(ExemptionGate::new(exemptions.clone())),
//!         )
//!         .configure(move |cfg| routes.configure(cfg))
//! });
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `macros` | Yes | The `#[rest_controller]` macro |

// Re-export everything from actix-gate-core
pub use actix_gate_core::*;

#[cfg(feature = "macros")]
pub use actix_gate_codegen::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use actix_gate_core::http::error::AuthError;
    pub use actix_gate_core::http::security::middleware::SecurityTransform;
    pub use actix_gate_core::http::security::{
        AuthenticatedUser, Authenticator, AuthorizationManager, Authorizer, Controller,
        ExemptionGate, ExemptionResolver, IgnoredUrlsProperties, Interface, Marker, MethodMeta,
        OptionalUser, RestController, Route, RouteTable, SecurityProperties, SharedExemptions,
        User,
    };

    #[cfg(feature = "macros")]
    pub use actix_gate_codegen::rest_controller;
}
