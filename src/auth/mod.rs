pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthSession;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name; must be non-empty once trimmed.
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    /// Email address; canonicalized to lowercase before it is stored.
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    /// At least 7 characters and must not contain the word "password".
    #[validate(
        length(min = 7, message = "password must be at least 7 characters"),
        custom = "crate::models::user::validate_password_content"
    )]
    pub password: String,
    /// Optional; defaults to 0 and may not be negative.
    #[serde(default)]
    #[validate(range(min = 0, message = "age must be a positive number"))]
    pub age: i32,
}

impl RegisterRequest {
    /// Trim name and email and lowercase the email. Run before `validate`,
    /// so that e.g. `" Ann "` passes the non-empty rule only if something
    /// survives trimming.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
    }
}

/// Payload for a login request.
///
/// Not validated beyond deserialization: any mismatch, malformed email
/// included, falls through to the single generic login failure.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response after successful registration or login: the user (serialized
/// without its sensitive fields) and a fresh session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
