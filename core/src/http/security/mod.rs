//! Authentication exemptions and the request gate.
//!
//! # Module Structure
//!
//! - `route` - Route registry abstraction, marker lookup, Actix route table
//! - `exemption` - Exemption resolver, set, snapshot and publication
//! - `ant_matcher` - Path pattern matching used by the gate
//! - `gate` - The request gate (`ExemptionGate`)
//! - `middleware` - Security middleware (`SecurityTransform`)
//! - `properties` - Statically configured exemptions
//! - `manager` - Startup wiring (`AuthorizationManager`)
//! - `extractor` - Actix Web extractors (`AuthenticatedUser`, `OptionalUser`)

// Re-exports for convenience
pub use ant_matcher::{PathMatcher, PathMatcherBuilder, PathMatchers};
pub use config::{Authenticator, Authorizer};
pub use exemption::{
    ExemptionResolver, ExemptionSet, ExemptionSnapshot, ResolveSummary, SharedExemptions,
};
pub use extractor::{AuthenticatedUser, OptionalUser};
pub use gate::ExemptionGate;
pub use manager::AuthorizationManager;
pub use properties::{IgnoredUrlsProperties, SecurityProperties};
pub use route::{
    Controller, Interface, Marker, MarkerLookup, MethodMeta, RestController, Route,
    RouteRegistry, RouteTable,
};
pub use user::User;

// Internal modules (private implementation details)
mod config;
mod extractor;
mod user;

// Public modules
pub mod ant_matcher;
pub mod exemption;
pub mod gate;
pub mod manager;
pub mod middleware;
pub mod properties;
pub mod route;
