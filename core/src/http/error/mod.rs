//! Error types.
//!
//! - [`AuthError`] is the unauthorized/forbidden pair answered to clients.
//! - [`ResolveError`] and friends are startup-time conditions raised while
//!   building the exemption set.

mod auth_error;
mod resolve_error;

pub use auth_error::AuthError;
pub use resolve_error::{ConfigError, IntrospectionError, PatternError, RegistryError, ResolveError};
