//! Health check mounted under both API versions.

use actix_web::{HttpResponse, Responder};

use actix_gate::prelude::*;

pub struct PingController;

#[rest_controller("/v1", "/v2")]
impl PingController {
    #[token_ignore]
    #[get("/ping")]
    async fn ping() -> impl Responder {
        HttpResponse::Ok().body("pong")
    }
}
