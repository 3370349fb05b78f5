//! Security middleware for Actix Web.

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::security::config::{Authenticator, Authorizer};

/// Security middleware factory.
///
/// Runs the authenticator, stores the user in request extensions, then
/// hands the request to the authorizer.
///
/// # Example
/// ```ignore
/// App::new().wrap(
///     SecurityTransform::new()
///         .config_authenticator(my_authenticator)
///         .config_authorizer(ExemptionGate::new(exemptions.clone()))
/// )
/// ```
pub struct SecurityTransform<Auth, Autho> {
    authenticator: Option<Rc<Auth>>,
    authorizer: Option<Rc<Autho>>,
}

impl<Auth, Autho> SecurityTransform<Auth, Autho> {
    pub fn new() -> Self {
        SecurityTransform {
            authorizer: None,
            authenticator: None,
        }
    }

    pub fn config_authenticator(mut self, authenticator: Auth) -> Self {
        self.authenticator = Some(Rc::new(authenticator));
        self
    }

    pub fn config_authorizer(mut self, authorizer: Autho) -> Self {
        self.authorizer = Some(Rc::new(authorizer));
        self
    }
}

impl<Auth, Autho> Default for SecurityTransform<Auth, Autho> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B, Auth, Autho> Transform<S, ServiceRequest> for SecurityTransform<Auth, Autho>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator + 'static,
    Autho: Authorizer<B> + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityService<Auth, Autho, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            authenticator: self.authenticator.clone(),
            authorizer: self.authorizer.clone(),
            service: Rc::new(service),
        })
    }
}

/// Security middleware service.
pub struct SecurityService<Auth, Autho, S> {
    authenticator: Option<Rc<Auth>>,
    authorizer: Option<Rc<Autho>>,
    service: Rc<S>,
}

impl<Auth, Autho, S, B> Service<ServiceRequest> for SecurityService<Auth, Autho, S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator,
    Autho: Authorizer<B>,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let user = self
            .authenticator
            .as_ref()
            .and_then(|auth| auth.get_user(&req));

        // Handlers read the user through the AuthenticatedUser extractor
        if let Some(ref u) = user {
            req.extensions_mut().insert(u.clone());
        }

        if let Some(authorizer) = &self.authorizer {
            let next = move |req: ServiceRequest| -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>> {
                let fut = service.call(req);
                Box::pin(fut)
            };

            authorizer.process(req, user.as_ref(), next)
        } else {
            let fut = service.call(req);
            Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            })
        }
    }
}
