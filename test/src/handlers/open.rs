//! Login and captcha endpoints (no token required).

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use actix_gate::prelude::*;

/// Default markers shared by every login-style controller.
pub fn open_api() -> Interface {
    Interface::new("OpenApi").method("login", MethodMeta::new().marker(Marker::TOKEN_IGNORE))
}

#[derive(Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub struct OpenController;

#[rest_controller("/admin/base/open")]
impl OpenController {
    /// Inherits `token_ignore` from `OpenApi::login`.
    #[overrides("OpenApi::login")]
    #[post("/login")]
    async fn login(form: web::Json<LoginForm>) -> impl Responder {
        HttpResponse::Ok().json(serde_json::json!({
            "token": format!("demo-token-{}", form.username),
        }))
    }

    #[token_ignore]
    #[get("/captcha")]
    async fn captcha() -> impl Responder {
        HttpResponse::Ok().json(serde_json::json!({ "captchaId": "1234", "data": "" }))
    }

    #[token_ignore]
    #[get("/refreshToken")]
    async fn refresh_token(user: OptionalUser) -> impl Responder {
        match user.into_inner() {
            Some(u) => HttpResponse::Ok().body(format!("refreshed for {}", u.get_username())),
            None => HttpResponse::Ok().body("refreshed anonymously"),
        }
    }
}
