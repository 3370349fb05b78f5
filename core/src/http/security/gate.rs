//! The request gate.
//!
//! Requests whose path matches an exemption pattern go straight to the
//! handler. Everything else needs an authenticated user, otherwise the gate
//! answers `401` with the JSON error body.

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, ResponseError};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, trace};

use crate::http::error::AuthError;
use crate::http::security::config::Authorizer;
use crate::http::security::exemption::SharedExemptions;
use crate::http::security::user::User;

/// [`Authorizer`] enforcing authentication outside the exemption set.
///
/// # Example
/// ```ignore
/// let exemptions = AuthorizationManager::exemptions(&properties, &routes)?;
///
/// HttpServer::new(move || {
///     App::new()
///         .wrap(
///             SecurityTransform::new()
///                 .config_authenticator(TokenAuthenticator::new())
///                 .config_authorizer(ExemptionGate::new(exemptions.clone())),
///         )
///         .configure(|cfg| routes.configure(cfg))
/// })
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExemptionGate {
    exemptions: SharedExemptions,
}

impl ExemptionGate {
    pub fn new(exemptions: SharedExemptions) -> Self {
        ExemptionGate { exemptions }
    }

    pub fn exemptions(&self) -> &SharedExemptions {
        &self.exemptions
    }
}

impl<B: 'static> Authorizer<B> for ExemptionGate {
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>
            + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let exempt = self.exemptions.is_exempt(req.path());

        if exempt || user.is_some() {
            trace!(path = req.path(), exempt, "request passes the gate");
            return Box::pin(async move {
                let res = next(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        debug!(path = req.path(), "unauthenticated request rejected");
        let response = AuthError::Unauthorized.error_response();
        Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
    }
}
