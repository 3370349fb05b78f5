//! Common test utilities and configuration.
//!
//! This module provides shared test infrastructure including:
//! - Test controllers declared with `#[rest_controller]`
//! - A bearer-token authenticator
//! - Route table and exemption builders
#![allow(dead_code)]

use std::collections::HashMap;

use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use actix_gate::prelude::*;

// =============================================================================
// Test Configuration
// =============================================================================

/// Authenticates `Authorization: Bearer <token>` against fixed tokens.
///
/// Tokens:
/// - admin-token: admin with base:sys:user:page
/// - guest-token: guest, no authorities
pub struct TokenAuthenticator {
    tokens: HashMap<&'static str, User>,
}

impl Authenticator for TokenAuthenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }
}

pub fn test_authenticator() -> TokenAuthenticator {
    let mut tokens = HashMap::new();
    tokens.insert(
        "admin-token",
        User::new("admin").authorities(&["base:sys:user:page".into()]),
    );
    tokens.insert("guest-token", User::new("guest"));
    TokenAuthenticator { tokens }
}

/// Helper function to create the bearer header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Statically configured exemptions.
pub fn test_properties() -> SecurityProperties {
    SecurityProperties::from_toml_str(
        r#"
        [ignored]
        urls = ["/actuator/**", "/static/*.css"]
        "#,
    )
    .expect("valid properties")
}

// =============================================================================
// Test Controllers
// =============================================================================

pub fn open_api() -> Interface {
    Interface::new("OpenApi").method("login", MethodMeta::new().marker(Marker::TOKEN_IGNORE))
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
}

pub struct OpenController;

#[rest_controller("/admin/base/open")]
impl OpenController {
    #[overrides("OpenApi::login")]
    #[post("/login")]
    async fn login(form: web::Json<LoginForm>) -> impl Responder {
        HttpResponse::Ok().body(format!("token for {}", form.username))
    }

    #[token_ignore]
    #[get("/captcha")]
    async fn captcha() -> impl Responder {
        HttpResponse::Ok().body("captcha")
    }

    #[token_ignore]
    #[get("/whoami")]
    async fn whoami(user: OptionalUser) -> impl Responder {
        match user.into_inner() {
            Some(u) => HttpResponse::Ok().body(u.get_username().to_string()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    /// Not marked: the prefix alone does not exempt it.
    #[get("/eps")]
    async fn eps() -> impl Responder {
        HttpResponse::Ok().body("eps")
    }
}

pub struct PingController;

#[rest_controller("/v1", "/v2")]
impl PingController {
    #[token_ignore]
    #[get("/ping", "/health")]
    async fn ping() -> impl Responder {
        HttpResponse::Ok().body("pong")
    }
}

pub struct UserController;

#[rest_controller("/admin/base/sys/user")]
impl UserController {
    #[get("/info")]
    async fn info(user: AuthenticatedUser) -> impl Responder {
        HttpResponse::Ok().body(format!("Welcome {}", user.get_username()))
    }

    #[post("/page")]
    async fn page(user: AuthenticatedUser) -> Result<HttpResponse, AuthError> {
        if !user.has_authority("base:sys:user:page") {
            return Err(AuthError::Forbidden);
        }
        Ok(HttpResponse::Ok().body("page"))
    }

    /// Claims to implement a method nobody declared.
    #[overrides("MissingApi::export")]
    #[get("/export")]
    async fn export() -> impl Responder {
        HttpResponse::Ok().body("export")
    }
}

pub struct RootController;

#[rest_controller]
impl RootController {
    #[token_ignore]
    #[get("/")]
    async fn index() -> impl Responder {
        HttpResponse::Ok().body("index")
    }
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().finish()
}

// =============================================================================
// Builders
// =============================================================================

pub fn test_routes() -> RouteTable {
    RouteTable::builder()
        .interface(open_api())
        .rest_controller::<OpenController>()
        .rest_controller::<PingController>()
        .rest_controller::<UserController>()
        .rest_controller::<RootController>()
        .controller(
            Controller::new("Fallback").route(Route::default_service(not_found).token_ignore()),
        )
        .build()
}

pub fn test_exemptions(routes: &RouteTable) -> SharedExemptions {
    AuthorizationManager::exemptions(&test_properties(), routes).expect("registry is readable")
}
