//! End-to-end tests of the request gate in front of macro-declared routes.

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use serde_json::Value;

use actix_gate::prelude::*;
use common::{bearer, test_authenticator, test_exemptions, test_routes};

macro_rules! gate_app {
    () => {{
        let routes = test_routes();
        let exemptions = test_exemptions(&routes);
        test::init_service(
            App::new()
                .wrap(
                    SecurityTransform::new()
                        .config_authenticator(test_authenticator())
                        .config_authorizer(ExemptionGate::new(exemptions)),
                )
                .configure(|cfg| routes.configure(cfg)),
        )
        .await
    }};
}

// =============================================================================
// Exempt routes
// =============================================================================

#[actix_web::test]
async fn test_token_ignore_route_needs_no_token() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/base/open/captcha")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "captcha");
}

#[actix_web::test]
async fn test_inherited_marker_exempts_login() {
    let app = gate_app!();

    let req = test::TestRequest::post()
        .uri("/admin/base/open/login")
        .set_json(serde_json::json!({ "username": "admin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "token for admin");
}

#[actix_web::test]
async fn test_every_prefix_and_pattern_is_exempt() {
    let app = gate_app!();

    for uri in ["/v1/ping", "/v2/ping", "/v1/health", "/v2/health"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }
}

#[actix_web::test]
async fn test_accumulated_prefixes_are_not_exempt() {
    let app = gate_app!();

    let req = test::TestRequest::get().uri("/v1/v2/ping").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_route_without_prefix_is_exempt() {
    let app = gate_app!();

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_configured_exemptions_pass_the_gate() {
    let app = gate_app!();

    // No handler is registered: the gate lets the request through to the
    // default service instead of answering 401.
    for uri in ["/actuator/health", "/actuator/metrics/jvm", "/static/site.css"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_exempt_route_still_sees_authenticated_user() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/base/open/whoami")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(test::read_body(resp).await, "anonymous");

    let req = test::TestRequest::get()
        .uri("/admin/base/open/whoami")
        .insert_header((header::AUTHORIZATION, bearer("guest-token")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(test::read_body(resp).await, "guest");
}

// =============================================================================
// Protected routes
// =============================================================================

#[actix_web::test]
async fn test_unmarked_route_requires_token() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/base/sys/user/info")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "unauthorized");
}

#[actix_web::test]
async fn test_unmarked_route_under_open_prefix_requires_token() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/base/open/eps")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_invalid_token_is_rejected() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/base/sys/user/info")
        .insert_header((header::AUTHORIZATION, bearer("stolen-token")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_authenticated_request_passes() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/base/sys/user/info")
        .insert_header((header::AUTHORIZATION, bearer("guest-token")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "Welcome guest");
}

#[actix_web::test]
async fn test_handler_can_answer_forbidden() {
    let app = gate_app!();

    let req = test::TestRequest::post()
        .uri("/admin/base/sys/user/page")
        .insert_header((header::AUTHORIZATION, bearer("guest-token")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 403);
    assert_eq!(body["message"], "forbidden");

    let req = test::TestRequest::post()
        .uri("/admin/base/sys/user/page")
        .insert_header((header::AUTHORIZATION, bearer("admin-token")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_dangling_override_stays_protected() {
    let app = gate_app!();

    let req = test::TestRequest::get()
        .uri("/admin/base/sys/user/export")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
