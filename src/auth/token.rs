use crate::error::AppError;
use crate::store;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Lifetime of an issued session token.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: i32,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signs a token for the given user id with the configured secret.
///
/// The token alone does not make a session: it must also be present in the
/// user's active-token list to pass the authorization gate.
pub fn generate_token(user_id: i32, secret: &str) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token's signature and expiry and decodes its claims.
///
/// A malformed, tampered, or expired token fails with the uniform
/// unauthorized error; the specific decode failure only reaches the logs.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))
}

/// Issues a new session token and appends it to the user's active-token
/// list. Existing sessions are untouched, so one user may hold several live
/// tokens (one per device).
pub async fn issue(pool: &PgPool, user_id: i32, secret: &str) -> Result<String, AppError> {
    let token = generate_token(user_id, secret)?;
    store::users::push_token(pool, user_id, &token).await?;
    Ok(token)
}

/// Removes exactly one token from the user's active-token list. The token
/// still decodes afterwards, but the gate's allow-list check rejects it.
pub async fn revoke(pool: &PgPool, user_id: i32, token: &str) -> Result<(), AppError> {
    store::users::remove_token(pool, user_id, token).await
}

/// Clears the user's active-token list, ending every session at once.
pub async fn revoke_all(pool: &PgPool, user_id: i32) -> Result<(), AppError> {
    store::users::clear_tokens(pool, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_for_gen_verify";

    #[test]
    fn test_token_generation_and_verification() {
        let user_id = 1;
        let token = generate_token(user_id, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = generate_token(7, SECRET).unwrap();
        match verify_token(&token, "a_completely_different_secret") {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("invalid token"));
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = generate_token(7, SECRET).unwrap();
        let mut tampered = token.clone();
        // Flip a character in the payload segment.
        let payload_start = token.find('.').unwrap() + 1;
        let replacement = if token.as_bytes()[payload_start] == b'A' {
            "B"
        } else {
            "A"
        };
        tampered.replace_range(payload_start..payload_start + 1, replacement);

        assert!(verify_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expiration = chrono::Utc::now()
            .checked_sub_signed(chrono::Duration::hours(2))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: 2,
            exp: expiration,
        };
        let expired_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        match verify_token(&expired_token, SECRET) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("ExpiredSignature"), "unexpected message: {}", msg);
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }
}
