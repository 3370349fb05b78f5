//! Ant-style path patterns.
//!
//! Patterns are compiled to anchored regular expressions once, at startup.
//!
//! # Pattern Syntax
//!
//! - `?` matches exactly one character within a segment
//! - `*` matches zero or more characters within a segment
//! - `**` matches zero or more segments
//! - `{name}` captures one segment
//! - `{name:regex}` captures a value matching `regex`
//! - `{*name}` captures the rest of the path (last segment only)
//!
//! A trailing slash on the request path is ignored.
//!
//! # Examples
//!
//! ```rust
//! use actix_gate_core::http::security::ant_matcher::PathMatcher;
//!
//! let matcher = PathMatcher::new("/api/**").unwrap();
//! assert!(matcher.matches("/api/users/123/profile"));
//!
//! let matcher = PathMatcher::new("/users/*/profile").unwrap();
//! assert!(matcher.matches("/users/123/profile"));
//! assert!(!matcher.matches("/users/123/456/profile"));
//! ```

use std::collections::HashMap;

use regex::{Regex, RegexSet};

use crate::http::error::PatternError;

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: String,
    regex: Regex,
}

impl PathMatcher {
    /// Compiles a case-sensitive matcher.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Self::compile(pattern, true)
    }

    /// Compiles a matcher ignoring ASCII and Unicode case.
    pub fn case_insensitive(pattern: &str) -> Result<Self, PatternError> {
        Self::compile(pattern, false)
    }

    fn compile(pattern: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        let mut source = String::new();
        if !case_sensitive {
            source.push_str("(?i)");
        }
        source.push_str(&to_regex(pattern)?);

        let regex = Regex::new(&source).map_err(|e| PatternError::Regex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(PathMatcher {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches and returns the captured path variables.
    ///
    /// ```rust
    /// use actix_gate_core::http::security::ant_matcher::PathMatcher;
    ///
    /// let matcher = PathMatcher::new("/users/{id}/posts/{postId}").unwrap();
    /// let vars = matcher.extract_variables("/users/123/posts/456").unwrap();
    /// assert_eq!(vars["id"], "123");
    /// assert_eq!(vars["postId"], "456");
    /// ```
    pub fn extract_variables(&self, path: &str) -> Option<HashMap<String, String>> {
        let captures = self.regex.captures(path)?;
        let variables = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|value| (name.to_string(), value.as_str().to_string()))
            })
            .collect();
        Some(variables)
    }
}

fn to_regex(pattern: &str) -> Result<String, PatternError> {
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let mut source = String::from("^");

    for (idx, segment) in segments.iter().enumerate() {
        if *segment == "**" {
            source.push_str("(?:/.*)?");
            continue;
        }

        if let Some(name) = segment.strip_prefix("{*").and_then(|s| s.strip_suffix('}')) {
            check_variable(pattern, name)?;
            if idx + 1 != segments.len() {
                return Err(PatternError::CaptureNotLast {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
            source.push_str(&format!("(?P<{}>(?:/.*)?)", name));
            continue;
        }

        source.push('/');
        push_segment(&mut source, pattern, segment)?;
    }

    source.push_str("/?$");
    Ok(source)
}

fn push_segment(source: &mut String, pattern: &str, segment: &str) -> Result<(), PatternError> {
    let mut literal = String::new();
    let mut chars = segment.chars();

    while let Some(c) = chars.next() {
        match c {
            '*' | '?' | '{' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
            }
            _ => {
                literal.push(c);
                continue;
            }
        }

        match c {
            '*' => source.push_str("[^/]*"),
            '?' => source.push_str("[^/]"),
            _ => {
                let mut depth = 1;
                let mut body = String::new();
                for c in chars.by_ref() {
                    if c == '{' {
                        depth += 1;
                    } else if c == '}' {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    body.push(c);
                }
                if depth != 0 {
                    return Err(PatternError::InvalidVariable {
                        pattern: pattern.to_string(),
                        name: body,
                    });
                }

                let (name, constraint) =
                    body.split_once(':').unwrap_or((body.as_str(), "[^/]+"));
                check_variable(pattern, name)?;
                source.push_str(&format!("(?P<{}>{})", name, constraint));
            }
        }
    }

    source.push_str(&regex::escape(&literal));
    Ok(())
}

fn check_variable(pattern: &str, name: &str) -> Result<(), PatternError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(PatternError::InvalidVariable {
            pattern: pattern.to_string(),
            name: name.to_string(),
        })
    }
}

/// Builder for matchers sharing a case policy.
#[derive(Debug, Clone)]
pub struct PathMatcherBuilder {
    case_sensitive: bool,
}

impl Default for PathMatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathMatcherBuilder {
    pub fn new() -> Self {
        Self {
            case_sensitive: true,
        }
    }

    /// Set case sensitivity (default: true)
    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.case_sensitive = sensitive;
        self
    }

    pub fn build(&self, pattern: &str) -> Result<PathMatcher, PatternError> {
        PathMatcher::compile(pattern, self.case_sensitive)
    }
}

/// A set of matchers tested together.
///
/// `matches` runs a single [`RegexSet`] pass over the path.
#[derive(Debug, Clone, Default)]
pub struct PathMatchers {
    matchers: Vec<PathMatcher>,
    set: Option<RegexSet>,
}

impl PathMatchers {
    pub fn new(matchers: Vec<PathMatcher>) -> Self {
        let set = RegexSet::new(matchers.iter().map(|m| m.regex.as_str())).ok();
        PathMatchers { matchers, set }
    }

    /// Compiles every pattern, failing on the first invalid one.
    pub fn compile<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matchers = patterns
            .into_iter()
            .map(|p| PathMatcher::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(matchers))
    }

    pub fn matches(&self, path: &str) -> bool {
        match &self.set {
            Some(set) => set.is_match(path),
            None => self.matchers.iter().any(|m| m.matches(path)),
        }
    }

    /// First matcher (in insertion order) accepting the path.
    pub fn find_match(&self, path: &str) -> Option<&PathMatcher> {
        match &self.set {
            Some(set) => set
                .matches(path)
                .iter()
                .next()
                .map(|idx| &self.matchers[idx]),
            None => self.matchers.iter().find(|m| m.matches(path)),
        }
    }

    pub fn find_all_matches(&self, path: &str) -> Vec<&PathMatcher> {
        self.matchers.iter().filter(|m| m.matches(path)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathMatcher> {
        self.matchers.iter()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
