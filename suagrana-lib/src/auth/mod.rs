use crate::user::Principal;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::Header;
use actix_web::{web, Error, HttpMessage, Scope};
use actix_web_httpauth::extractors::{bearer, AuthenticationError};
use actix_web_httpauth::headers::authorization::{self, Authorization};
use actix_web_httpauth::headers::www_authenticate::bearer::Bearer;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use jwt::JWTAuth;
use tracing_actix_web::RootSpan;

pub mod handlers;
pub mod jwt;
pub mod password;

pub const AUTH_COOKIE: &str = "auth-token";

pub fn auth_service(signups_enabled: bool) -> Scope {
    let scope = web::scope("/auth")
        .service(handlers::get_token)
        .service(handlers::logout);
    if signups_enabled {
        scope.service(handlers::signup)
    } else {
        scope
    }
}

/// The token from the `Authorization: Bearer` header, or from the auth cookie when the header is
/// absent.
fn request_token(req: &ServiceRequest) -> Option<String> {
    match Authorization::<authorization::Bearer>::parse(req) {
        Ok(header) => Some(header.as_ref().token().to_string()),
        Err(_) => req.cookie(AUTH_COOKIE).map(|c| c.value().to_owned()),
    }
}

/// Validates the request's token using [JWTAuth]. If valid, the [Principal] is injected into the
/// request and recorded on the [RootSpan].
pub fn credentials_validator(req: &ServiceRequest) -> Result<(), Error> {
    let principal = req
        .app_data::<JWTAuth>()
        .zip(request_token(req))
        .and_then(|(jwt_auth, token)| jwt_auth.validate_token(&token).ok());

    match principal {
        Some(principal) => {
            if let Some(root_span) = req.extensions().get::<RootSpan>() {
                root_span.record("user_id", principal.user_id.as_str());
                root_span.record("tenant_id", principal.tenant_id.as_str());
            }
            req.extensions_mut().insert::<Principal>(principal);
            Ok(())
        }
        None => {
            let challenge = Bearer::build().error(bearer::Error::InvalidToken).finish();
            Err(AuthenticationError::new(challenge).into())
        }
    }
}

/// Rejects requests without a valid token with 401.
pub struct JWTAuthentication;

impl<S, B> Transform<S, ServiceRequest> for JWTAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JWTAuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JWTAuthenticationMiddleware { service }))
    }
}

pub struct JWTAuthenticationMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JWTAuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(e) = credentials_validator(&req) {
            return Box::pin(ready(Err(e)));
        }
        Box::pin(self.service.call(req))
    }
}
