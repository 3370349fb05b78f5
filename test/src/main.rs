//! Actix Gate demo application.
//!
//! Routes marked `token_ignore` are discovered at startup and served
//! without a token; everything else needs `Authorization: Bearer <token>`.

mod token;

use std::{env, io};

use actix_web::{App, HttpResponse, HttpServer};
use tracing::error;
use tracing_subscriber::EnvFilter;

use actix_gate::prelude::*;

use handlers::open::{open_api, OpenController};
use handlers::ping::PingController;
use handlers::user::UserController;
use token::TokenAuthenticator;

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "code": 404, "message": "not found" }))
}

fn routes() -> RouteTable {
    RouteTable::builder()
        .interface(open_api())
        .rest_controller::<OpenController>()
        .rest_controller::<UserController>()
        .rest_controller::<PingController>()
        .controller(Controller::new("Fallback").route(Route::default_service(not_found)))
        .build()
}

fn properties() -> io::Result<SecurityProperties> {
    match env::var("GATE_PROPERTIES") {
        Ok(path) => SecurityProperties::load(&path).map_err(io::Error::other),
        Err(_) => Ok(SecurityProperties::new()
            .with_ignored(IgnoredUrlsProperties::new().url("/favicon.ico"))),
    }
}

fn print_startup_info(exemptions: &SharedExemptions) {
    println!("=== Actix Gate Demo ===");
    println!();
    println!("Server: http://127.0.0.1:8080");
    println!();
    println!("Exempt from authentication:");
    for pattern in exemptions.load().patterns() {
        println!("  {}", pattern);
    }
    println!();
    println!("Tokens:");
    println!("  admin-token - authorities: [base:sys:user:page]");
    println!("  guest-token - authorities: []");
    println!();
    println!("Examples:");
    println!("  curl http://127.0.0.1:8080/v1/ping");
    println!("  curl http://127.0.0.1:8080/admin/base/open/captcha");
    println!("  curl http://127.0.0.1:8080/admin/base/sys/user/info            # 401");
    println!("  curl -H 'Authorization: Bearer guest-token' http://127.0.0.1:8080/admin/base/sys/user/info");
    println!("  curl -X POST -H 'Authorization: Bearer guest-token' http://127.0.0.1:8080/admin/base/sys/user/page  # 403");
    println!();
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let properties = properties()?;
    let routes = routes();

    // Without a complete scan the exemption set is unknown: refuse to start.
    let exemptions = AuthorizationManager::exemptions(&properties, &routes).map_err(|err| {
        error!(error = %err, "startup aborted");
        io::Error::other(err)
    })?;

    print_startup_info(&exemptions);

    HttpServer::new(move || {
        let routes = routes.clone();
        App::new()
            .wrap(
                SecurityTransform::new()
                    .config_authenticator(TokenAuthenticator::demo())
                    .config_authorizer(AuthorizationManager::exemption_gate(exemptions.clone())),
            )
            .configure(move |cfg| routes.configure(cfg))
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
