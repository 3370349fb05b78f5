//! Authentication exemptions.
//!
//! [`ExemptionResolver`] scans a route registry for handlers carrying the
//! exemption marker and appends their full path patterns to an
//! [`ExemptionSet`]. The set is then frozen into an [`ExemptionSnapshot`]
//! and published through [`SharedExemptions`], which request workers read
//! without locking.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::http::error::ResolveError;
use crate::http::security::ant_matcher::{PathMatcher, PathMatchers};
use crate::http::security::properties::IgnoredUrlsProperties;
use crate::http::security::route::{combine_patterns, Marker, MarkerLookup, RouteRegistry};

/// Mutable set of exempt path patterns, used while setting up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptionSet {
    patterns: HashSet<String>,
}

impl ExemptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set pre-seeded with configured patterns.
    pub fn seeded<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        set.extend(urls);
        set
    }

    /// Returns `false` when the pattern was already present.
    pub fn insert(&mut self, pattern: impl Into<String>) -> bool {
        self.patterns.insert(pattern.into())
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Ends the setup phase.
    ///
    /// Patterns that do not compile are logged and left out of the matchers,
    /// so they exempt nothing.
    pub fn freeze(self) -> ExemptionSnapshot {
        let mut patterns: Vec<String> = self.patterns.into_iter().collect();
        patterns.sort();

        let mut matchers = Vec::with_capacity(patterns.len());
        for pattern in &patterns {
            match PathMatcher::new(pattern) {
                Ok(matcher) => matchers.push(matcher),
                Err(err) => warn!(%pattern, error = %err, "ignoring invalid exemption pattern"),
            }
        }

        ExemptionSnapshot {
            patterns,
            matchers: PathMatchers::new(matchers),
        }
    }
}

impl<S: Into<String>> Extend<S> for ExemptionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.patterns.extend(iter.into_iter().map(Into::into));
    }
}

/// Immutable view of the exemptions, consulted on every request.
#[derive(Debug, Clone, Default)]
pub struct ExemptionSnapshot {
    patterns: Vec<String>,
    matchers: PathMatchers,
}

impl ExemptionSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.matchers.matches(path)
    }

    /// The pattern that exempts `path`, if any.
    pub fn find_match(&self, path: &str) -> Option<&str> {
        self.matchers.find_match(path).map(PathMatcher::pattern)
    }

    /// All patterns, sorted, including ones that failed to compile.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Counters reported by [`ExemptionResolver::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Handlers enumerated from the registry.
    pub scanned: usize,
    /// Handlers carrying the marker and at least one pattern.
    pub exempt: usize,
    /// Marked handlers without structural patterns.
    pub without_patterns: usize,
    /// Handlers whose marker lookup failed (kept protected).
    pub failed: usize,
    /// Patterns that were not already in the set.
    pub inserted: usize,
}

/// Derives exempt path patterns from marked handlers.
#[derive(Debug, Clone)]
pub struct ExemptionResolver {
    marker: Marker,
}

impl Default for ExemptionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExemptionResolver {
    /// A resolver looking for [`Marker::TOKEN_IGNORE`].
    pub fn new() -> Self {
        Self::with_marker(Marker::TOKEN_IGNORE)
    }

    pub fn with_marker(marker: Marker) -> Self {
        ExemptionResolver { marker }
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Appends the patterns of every marked handler to `exemptions`.
    ///
    /// A handler whose marker lookup fails is treated as not exempt and the
    /// scan continues. Failing to enumerate the registry aborts.
    pub fn resolve<R>(
        &self,
        registry: &R,
        exemptions: &mut ExemptionSet,
    ) -> Result<ResolveSummary, ResolveError>
    where
        R: RouteRegistry + MarkerLookup + ?Sized,
    {
        let handlers = registry.handler_methods()?;
        let mut summary = ResolveSummary::default();

        for (condition, handler) in &handlers {
            summary.scanned += 1;
            let id = handler.id();

            match registry.find_merged_marker(&id, &self.marker) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    summary.failed += 1;
                    warn!(handler = %id, error = %err, "marker lookup failed, authentication stays required");
                    continue;
                }
            }

            let Some(patterns) = condition.patterns() else {
                summary.without_patterns += 1;
                debug!(handler = %id, "marked handler has no path pattern");
                continue;
            };

            summary.exempt += 1;
            for pattern in combine_patterns(handler.bean_type().prefixes(), patterns) {
                debug!(handler = %id, %pattern, "exempt from authentication");
                if exemptions.insert(pattern) {
                    summary.inserted += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Published exemption snapshot, swapped atomically on reload.
#[derive(Clone)]
pub struct SharedExemptions {
    current: Arc<ArcSwap<ExemptionSnapshot>>,
}

impl SharedExemptions {
    pub fn new(snapshot: ExemptionSnapshot) -> Self {
        SharedExemptions {
            current: Arc::new(ArcSwap::from_pointee(snapshot)),
        }
    }

    pub fn load(&self) -> Arc<ExemptionSnapshot> {
        self.current.load_full()
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.current.load().is_exempt(path)
    }

    pub fn publish(&self, snapshot: ExemptionSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Rebuilds the exemptions from configuration plus a fresh scan and
    /// publishes them. On error the current snapshot stays in place.
    pub fn reload<R>(
        &self,
        ignored: &IgnoredUrlsProperties,
        resolver: &ExemptionResolver,
        registry: &R,
    ) -> Result<ResolveSummary, ResolveError>
    where
        R: RouteRegistry + MarkerLookup + ?Sized,
    {
        let mut exemptions = ExemptionSet::seeded(ignored.urls());
        let summary = resolver.resolve(registry, &mut exemptions)?;
        self.publish(exemptions.freeze());
        Ok(summary)
    }
}

impl Default for SharedExemptions {
    fn default() -> Self {
        Self::new(ExemptionSnapshot::empty())
    }
}

impl fmt::Debug for SharedExemptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedExemptions")
            .field("patterns", &self.current.load().patterns())
            .finish()
    }
}
