use crate::error::AppError;
use crate::models::User;
use sqlx::PgPool;

pub async fn insert(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    age: i32,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password, age)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, email, password, age, tokens, created_at, updated_at",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(age)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, age, tokens, created_at, updated_at
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Resolves a session: the user must exist *and* still hold the exact token
/// string on its active-token list. A revoked token or a deleted user both
/// come back as `None`.
pub async fn find_by_id_and_token(
    pool: &PgPool,
    id: i32,
    token: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, age, tokens, created_at, updated_at
         FROM users WHERE id = $1 AND $2 = ANY(tokens)",
    )
    .bind(id)
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Persists the mutable profile fields. `password` is expected to already
/// be a digest.
pub async fn update(pool: &PgPool, user: &User) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET name = $2, email = $3, password = $4, age = $5, updated_at = now()
         WHERE id = $1
         RETURNING id, name, email, password, age, tokens, created_at, updated_at",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password)
    .bind(user.age)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn push_token(pool: &PgPool, id: i32, token: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE users SET tokens = array_append(tokens, $2), updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn remove_token(pool: &PgPool, id: i32, token: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE users SET tokens = array_remove(tokens, $2), updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn clear_tokens(pool: &PgPool, id: i32) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET tokens = '{}', updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
