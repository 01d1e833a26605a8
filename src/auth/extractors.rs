use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The authentication result the gate binds into request extensions: the
/// resolved user entity plus the raw token the session presented.
///
/// Handlers take this as an explicit parameter instead of re-querying the
/// store; `logout` needs the raw token to know which session to revoke.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl FromRequest for AuthSession {
    type Error = ActixError; // AppError converts into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthSession>().cloned() {
            Some(session) => ready(Ok(session)),
            None => {
                // Only reachable if a protected route was wired up without
                // the gate. Unauthorized is the safe answer.
                let err = AppError::Unauthorized(
                    "no session in request extensions; is AuthMiddleware active?".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;

    fn sample_session() -> AuthSession {
        let now = Utc::now();
        AuthSession {
            user: User {
                id: 123,
                name: "Ann".to_string(),
                email: "ann@x.com".to_string(),
                password: "digest".to_string(),
                age: 0,
                tokens: vec!["tok".to_string()],
                created_at: now,
                updated_at: now,
            },
            token: "tok".to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_auth_session_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(sample_session());

        let mut payload = Payload::None;
        let extracted = AuthSession::from_request(&req, &mut payload).await;
        assert!(extracted.is_ok());

        let session = extracted.unwrap();
        assert_eq!(session.user.id, 123);
        assert_eq!(session.token, "tok");
    }

    #[actix_rt::test]
    async fn test_auth_session_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();
        // Nothing inserted into extensions.

        let mut payload = Payload::None;
        let result = AuthSession::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
