use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Field names a profile patch may carry; anything else is rejected outright.
pub const ALLOWED_UPDATES: [&str; 4] = ["name", "email", "password", "age"];

/// A user row as stored in the database.
///
/// `password` holds the bcrypt digest (never plaintext) and `tokens` holds
/// the active session tokens. Both are skipped whenever a user is serialized
/// outward, so API responses only ever expose the non-sensitive fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub age: i32,
    #[serde(skip_serializing)]
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a user profile. Every field optional; key filtering
/// against [`ALLOWED_UPDATES`] happens before deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(
        length(min = 7, message = "password must be at least 7 characters"),
        custom = "validate_password_content"
    )]
    pub password: Option<String>,
    #[validate(range(min = 0, message = "age must be a positive number"))]
    pub age: Option<i32>,
}

impl UserPatch {
    /// Trims the name and canonicalizes the email, mirroring what
    /// registration does. Run before `validate`.
    pub fn normalize(&mut self) {
        if let Some(name) = &mut self.name {
            *name = name.trim().to_string();
        }
        if let Some(email) = &mut self.email {
            *email = email.trim().to_lowercase();
        }
    }
}

/// Passwords must not contain the word "password", in any casing.
pub fn validate_password_content(password: &str) -> Result<(), ValidationError> {
    if password.to_lowercase().contains("password") {
        let mut error = ValidationError::new("password_content");
        error.message = Some("password cannot contain \"password\"".into());
        return Err(error);
    }
    Ok(())
}
