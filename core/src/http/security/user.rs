//! The authenticated principal.

/// A user identified by the token filter.
///
/// # Example
/// ```
/// use actix_gate_core::http::security::User;
///
/// let user = User::new("admin").authorities(&["base:sys:user:page".into()]);
///
/// assert_eq!(user.get_username(), "admin");
/// assert!(user.has_authority("base:sys:user:page"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    username: String,
    authorities: Vec<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        User {
            username: username.into(),
            authorities: Vec::new(),
        }
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_authorities(&self) -> &[String] {
        &self.authorities
    }

    /// Adds authorities to the user (builder pattern).
    pub fn authorities(mut self, authorities: &[String]) -> Self {
        for authority in authorities {
            if !self.authorities.contains(authority) {
                self.authorities.push(authority.clone());
            }
        }
        self
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Checks if the user has ANY of the specified authorities (OR logic).
    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities.iter().any(|auth| self.has_authority(auth))
    }
}
