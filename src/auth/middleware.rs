use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::extractors::AuthSession;
use crate::auth::token::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::store;

/// Authorization gate wrapped around the `/users` and `/tasks` scopes.
///
/// Runs the credential checks in order, stopping at the first failure:
/// bearer header present, token verifies against the configured secret, and
/// the token is still on the decoded user's active-token list. On success
/// the resolved [`AuthSession`] is bound into request extensions so
/// handlers never perform a second lookup.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Registration and login are the only unauthenticated endpoints
        // behind this gate.
        if req.method() == &Method::POST
            && (req.path() == "/users" || req.path() == "/users/login")
        {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let session = authenticate(&req).await?;
            req.extensions_mut().insert(session);
            service.call(req).await
        })
    }
}

/// The three checks of the gate. Each distinct failure keeps its cause for
/// the logs, but all of them surface as the same 401 to the caller.
async fn authenticate(req: &ServiceRequest) -> Result<AuthSession, AppError> {
    let config = req.app_data::<web::Data<Config>>().ok_or_else(|| {
        AppError::InternalServerError("configuration missing from app data".into())
    })?;
    let pool = req.app_data::<web::Data<PgPool>>().ok_or_else(|| {
        AppError::InternalServerError("database pool missing from app data".into())
    })?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthorized("missing or malformed Authorization header".into())
        })?
        .to_string();

    let claims = verify_token(&token, &config.jwt_secret)?;

    // One query covers revoked tokens and deleted users alike: the session
    // is only valid while the exact token string sits on the user's
    // allow-list.
    let user = store::users::find_by_id_and_token(pool, claims.sub, &token)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized(format!("no active session for user {}", claims.sub))
        })?;

    Ok(AuthSession { user, token })
}
