use actix_service::{Service, Transform};
use actix_web::{dev::ServiceRequest, dev::ServiceResponse, web, HttpMessage};
use futures::future::{ok, ready, Future};
use futures::FutureExt;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::models::identity::CallerIdentity;
use crate::utils::auth::AuthSettings;
use crate::utils::error::ApiError;

/// Rejects requests without a valid bearer token and attaches the caller identity.
pub struct JwtMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = JwtMiddlewareService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>> + 'static>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtMiddlewareService { service }).boxed_local()
    }
}

pub struct JwtMiddlewareService<S> {
    service: S,
}

fn authenticate(req: &ServiceRequest) -> Result<CallerIdentity, ApiError> {
    let settings = req
        .app_data::<web::Data<AuthSettings>>()
        .ok_or(ApiError::Unauthorized("Authentication is not configured"))?;

    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or(ApiError::Unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized("Invalid Authorization header format"))?;

    let claims = settings.decode_token(token)?;

    Ok(CallerIdentity {
        id: claims.user_id,
        role: claims.role,
    })
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + 'static>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(identity) => {
                log::debug!("authenticated user {} as {}", identity.id, identity.role);
                req.extensions_mut().insert(identity);
                self.service.call(req).boxed_local()
            }
            Err(e) => {
                log::info!("rejected {} {}: {}", req.method(), req.path(), e);
                let error: actix_web::Error = e.into();
                ready(Err(error)).boxed_local()
            }
        }
    }
}
