use actix_web::http::header::ContentType;
use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder, ResponseError};
use derive_more::{Display, Error};
use serde::Serialize;

/// Errors answered to the client when a request is refused.
///
/// `Unauthorized` and `TokenError` are the entry-point side (401),
/// `Forbidden` the access-denied side (403).
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[display("token error")]
    TokenError,
    #[display("forbidden")]
    Forbidden,
    #[display("unauthorized")]
    Unauthorized,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    message: &'a str,
}

impl AuthError {
    /// Serializes the JSON body sent with the error response.
    pub fn body(&self) -> String {
        let message = self.to_string();
        let body = ErrorBody {
            code: self.status_code().as_u16(),
            message: &message,
        };
        serde_json::to_string(&body).unwrap_or_default()
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::TokenError => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code())
            .content_type(ContentType::json())
            .body(self.body())
    }
}
