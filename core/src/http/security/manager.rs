//! Startup wiring.

use tracing::info;

use crate::http::error::ResolveError;
use crate::http::security::exemption::{ExemptionResolver, ExemptionSet, SharedExemptions};
use crate::http::security::gate::ExemptionGate;
use crate::http::security::properties::SecurityProperties;
use crate::http::security::route::{MarkerLookup, RouteRegistry};

pub struct AuthorizationManager {}

impl AuthorizationManager {
    /// Seeds the exemptions from `properties`, adds every `token_ignore`
    /// handler of `registry` and publishes the frozen result.
    ///
    /// Call this before starting the server: an error means the route
    /// registry could not be read and the process should not serve requests.
    pub fn exemptions<R>(
        properties: &SecurityProperties,
        registry: &R,
    ) -> Result<SharedExemptions, ResolveError>
    where
        R: RouteRegistry + MarkerLookup + ?Sized,
    {
        Self::exemptions_with(properties, &ExemptionResolver::new(), registry)
    }

    pub fn exemptions_with<R>(
        properties: &SecurityProperties,
        resolver: &ExemptionResolver,
        registry: &R,
    ) -> Result<SharedExemptions, ResolveError>
    where
        R: RouteRegistry + MarkerLookup + ?Sized,
    {
        let mut exemptions = ExemptionSet::seeded(properties.ignored().urls());
        let summary = resolver.resolve(registry, &mut exemptions)?;
        let snapshot = exemptions.freeze();

        info!(
            marker = %resolver.marker(),
            scanned = summary.scanned,
            exempt = summary.exempt,
            failed = summary.failed,
            patterns = snapshot.len(),
            "authentication exemptions resolved"
        );

        Ok(SharedExemptions::new(snapshot))
    }

    pub fn exemption_gate(exemptions: SharedExemptions) -> ExemptionGate {
        ExemptionGate::new(exemptions)
    }
}
