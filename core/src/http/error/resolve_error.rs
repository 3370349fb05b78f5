use derive_more::{Display, Error};

/// The route registry could not be enumerated.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("route registry unavailable: {reason}")]
pub struct RegistryError {
    #[error(not(source))]
    pub reason: String,
}

impl RegistryError {
    pub fn new(reason: impl Into<String>) -> Self {
        RegistryError {
            reason: reason.into(),
        }
    }
}

/// Marker lookup failed for a single handler method.
///
/// Never fatal: the handler is treated as requiring authentication.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    #[display("no metadata registered for method `{_0}`")]
    UnknownMethod(#[error(not(source))] String),
    #[display("override chain of `{method}` loops back through `{repeated}`")]
    CyclicOverride { method: String, repeated: String },
}

/// Fatal error while building the exemption set.
#[derive(Debug, Display, Error)]
pub enum ResolveError {
    #[display("cannot resolve authentication exemptions: {_0}")]
    Registry(RegistryError),
}

impl From<RegistryError> for ResolveError {
    fn from(err: RegistryError) -> Self {
        ResolveError::Registry(err)
    }
}

/// A path pattern could not be compiled.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[display("invalid variable `{name}` in pattern `{pattern}`")]
    InvalidVariable { pattern: String, name: String },
    #[display("`{{*{name}}}` must be the last segment of pattern `{pattern}`")]
    CaptureNotLast { pattern: String, name: String },
    #[display("pattern `{pattern}` does not compile: {reason}")]
    Regex { pattern: String, reason: String },
}

/// Security properties could not be loaded.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("cannot read security properties: {_0}")]
    Io(std::io::Error),
    #[display("cannot parse security properties: {_0}")]
    Parse(toml::de::Error),
}
