//! Route registry abstraction.
//!
//! The exemption resolver never looks at Actix directly. It reads a
//! [`RouteRegistry`] (which routes exist and under which patterns) and a
//! [`MarkerLookup`] (which markers a handler method carries, including the
//! ones inherited through override links). [`RouteTable`] implements both.

use std::fmt;
use std::sync::Arc;

use actix_web::http::Method;

use crate::http::error::{IntrospectionError, RegistryError};

mod marker;
mod table;

pub use marker::{Marker, MarkerTable, MethodMeta};
pub use table::{Controller, Interface, RestController, Route, RouteTable, RouteTableBuilder};

/// A path pattern as declared on a route.
///
/// Opaque to the registry; its syntax is whatever the request gate's
/// [`PathMatcher`](crate::http::security::ant_matcher::PathMatcher) accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathPattern(String);

impl PathPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        PathPattern(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        PathPattern::new(pattern)
    }
}

impl From<String> for PathPattern {
    fn from(pattern: String) -> Self {
        PathPattern(pattern)
    }
}

/// The conditions under which a request is dispatched to a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCondition {
    patterns: Vec<PathPattern>,
    methods: Vec<Method>,
}

impl MatchCondition {
    pub fn new<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathPattern>,
    {
        MatchCondition {
            patterns: patterns.into_iter().map(Into::into).collect(),
            methods: Vec::new(),
        }
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Structural path patterns, or `None` when the condition has none
    /// (a default service, for instance).
    pub fn patterns(&self) -> Option<&[PathPattern]> {
        if self.patterns.is_empty() {
            None
        } else {
            Some(&self.patterns)
        }
    }

    /// HTTP methods the route is bound to. Empty means any method.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

/// Identity of a handler method: `"Type::method"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(String);

impl MethodId {
    pub fn new(type_name: &str, method: &str) -> Self {
        MethodId(format!("{}::{}", type_name, method))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MethodId {
    fn from(id: &str) -> Self {
        MethodId(id.to_string())
    }
}

impl From<String> for MethodId {
    fn from(id: String) -> Self {
        MethodId(id)
    }
}

/// The type declaring a group of handlers, with its class-level prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerType {
    name: String,
    request_mapping: Vec<String>,
}

impl HandlerType {
    pub fn new(name: impl Into<String>) -> Self {
        HandlerType {
            name: name.into(),
            request_mapping: Vec::new(),
        }
    }

    pub fn request_mapping<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request_mapping.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefixes(&self) -> &[String] {
        &self.request_mapping
    }
}

/// A registered endpoint: declaring type plus method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMethod {
    bean_type: Arc<HandlerType>,
    method: String,
}

impl HandlerMethod {
    pub fn new(bean_type: Arc<HandlerType>, method: impl Into<String>) -> Self {
        HandlerMethod {
            bean_type,
            method: method.into(),
        }
    }

    pub fn bean_type(&self) -> &HandlerType {
        &self.bean_type
    }

    pub fn method_name(&self) -> &str {
        &self.method
    }

    pub fn id(&self) -> MethodId {
        MethodId::new(self.bean_type.name(), &self.method)
    }
}

/// Enumerates the registered `(condition, handler)` pairs.
pub trait RouteRegistry {
    fn handler_methods(&self) -> Result<Vec<(MatchCondition, HandlerMethod)>, RegistryError>;
}

/// Resolves the effective markers of a handler method.
///
/// A marker applies when it is declared on the method itself or on any
/// method reachable through its override links.
pub trait MarkerLookup {
    fn find_merged_marker(
        &self,
        method: &MethodId,
        marker: &Marker,
    ) -> Result<bool, IntrospectionError>;
}

/// Joins a class-level prefix and a method-level pattern with exactly one `/`.
pub fn join_path(prefix: &str, pattern: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let pattern = pattern.trim_start_matches('/');

    match (prefix.is_empty(), pattern.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", pattern),
        (false, true) => ensure_leading_slash(prefix),
        (false, false) => format!("{}/{}", ensure_leading_slash(prefix), pattern),
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Full patterns of a handler: one per `(prefix, pattern)` pair, or the
/// method patterns alone when the type declares no prefix.
pub fn combine_patterns(prefixes: &[String], patterns: &[PathPattern]) -> Vec<String> {
    if prefixes.is_empty() {
        return patterns.iter().map(|p| join_path("", p.as_str())).collect();
    }

    prefixes
        .iter()
        .flat_map(|prefix| patterns.iter().map(move |p| join_path(prefix, p.as_str())))
        .collect()
}
