//! # Actix Gate Core
//!
//! Authentication-exemption resolution for Actix Web.
//!
//! Routes are declared once in a [`RouteTable`](http::security::route::RouteTable),
//! which both registers them with Actix and records which handlers carry the
//! `token_ignore` marker. At startup the
//! [`ExemptionResolver`](http::security::exemption::ExemptionResolver) turns
//! those markers into path patterns, and the
//! [`ExemptionGate`](http::security::gate::ExemptionGate) lets matching
//! requests through without authentication.

pub mod http;
