//! Handler markers and the merged marker lookup table.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::http::error::IntrospectionError;

use super::{MarkerLookup, MethodId};

/// A tag attached to a handler method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(&'static str);

impl Marker {
    /// Requests routed to the handler bypass authentication.
    pub const TOKEN_IGNORE: Marker = Marker("token_ignore");

    pub const fn custom(name: &'static str) -> Self {
        Marker(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Markers declared directly on one method, plus the methods it overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodMeta {
    markers: HashSet<Marker>,
    overrides: Vec<MethodId>,
}

impl MethodMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.insert(marker);
        self
    }

    pub fn markers(mut self, markers: impl IntoIterator<Item = Marker>) -> Self {
        self.markers.extend(markers);
        self
    }

    /// Adds an override link. A method may implement several interfaces.
    pub fn overrides(mut self, parent: impl Into<MethodId>) -> Self {
        let parent = parent.into();
        if !self.overrides.contains(&parent) {
            self.overrides.push(parent);
        }
        self
    }

    pub fn has_marker(&self, marker: &Marker) -> bool {
        self.markers.contains(marker)
    }

    pub fn parents(&self) -> &[MethodId] {
        &self.overrides
    }

    fn merge(&mut self, other: MethodMeta) {
        self.markers.extend(other.markers);
        for parent in other.overrides {
            if !self.overrides.contains(&parent) {
                self.overrides.push(parent);
            }
        }
    }
}

/// Method metadata keyed by [`MethodId`], built at registration time.
#[derive(Debug, Clone, Default)]
pub struct MarkerTable {
    methods: HashMap<MethodId, MethodMeta>,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records metadata for a method. Registering the same method twice
    /// unions its markers and override links.
    pub fn register(&mut self, method: MethodId, meta: MethodMeta) {
        match self.methods.get_mut(&method) {
            Some(existing) => existing.merge(meta),
            None => {
                self.methods.insert(method, meta);
            }
        }
    }

    pub fn get(&self, method: &MethodId) -> Option<&MethodMeta> {
        self.methods.get(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl MarkerTable {
    /// Depth-first walk over the override graph. Every reachable method is
    /// visited, so an unknown or cyclic link anywhere fails the lookup even
    /// when another branch carries the marker.
    fn visit<'a>(
        &'a self,
        method: &'a MethodId,
        marker: &Marker,
        root: &MethodId,
        path: &mut Vec<&'a MethodId>,
        done: &mut HashSet<&'a MethodId>,
    ) -> Result<bool, IntrospectionError> {
        let meta = self
            .methods
            .get(method)
            .ok_or_else(|| IntrospectionError::UnknownMethod(method.to_string()))?;

        path.push(method);
        let mut found = meta.has_marker(marker);

        for parent in meta.parents() {
            if path.contains(&parent) {
                return Err(IntrospectionError::CyclicOverride {
                    method: root.to_string(),
                    repeated: parent.to_string(),
                });
            }
            if done.contains(parent) {
                continue;
            }
            found |= self.visit(parent, marker, root, path, done)?;
        }

        path.pop();
        done.insert(method);
        Ok(found)
    }
}

impl MarkerLookup for MarkerTable {
    fn find_merged_marker(
        &self,
        method: &MethodId,
        marker: &Marker,
    ) -> Result<bool, IntrospectionError> {
        let mut path = Vec::new();
        let mut done = HashSet::new();
        self.visit(method, marker, method, &mut path, &mut done)
    }
}
