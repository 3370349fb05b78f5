//! Demo token filter.
//!
//! Stands in for a real token verifier: bearer tokens are looked up in a
//! fixed table.

use std::collections::HashMap;

use actix_web::dev::ServiceRequest;
use actix_web::http::header;

use actix_gate::prelude::*;

pub struct TokenAuthenticator {
    tokens: HashMap<String, User>,
}

impl TokenAuthenticator {
    pub fn demo() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(
            "admin-token".to_string(),
            User::new("admin").authorities(&["base:sys:user:page".into()]),
        );
        tokens.insert("guest-token".to_string(), User::new("guest"));
        TokenAuthenticator { tokens }
    }
}

impl Authenticator for TokenAuthenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }
}
