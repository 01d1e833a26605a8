use crate::{
    auth::{
        hash_password, token, verify_password, AuthResponse, AuthSession, LoginRequest,
        RegisterRequest,
    },
    config::Config,
    error::AppError,
    models::{user, UserPatch},
    store,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user.
///
/// Creates the account and immediately opens a session, so the response
/// carries both the stored profile and a token.
#[post("")]
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let mut payload = payload.into_inner();
    payload.normalize();
    payload.validate()?;

    // Pre-check for a friendlier message; the unique index covers the race.
    if store::users::find_by_email(&pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::ValidationError("email is already in use".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = store::users::insert(
        &pool,
        &payload.name,
        &payload.email,
        &password_hash,
        payload.age,
    )
    .await?;

    let token = token::issue(&pool, user.id, &config.jwt_secret).await?;

    Ok(HttpResponse::Created().json(AuthResponse { user, token }))
}

/// Login with email and password.
///
/// Issues an additional session token; sessions on other devices stay
/// valid. Every failure mode produces the same generic response.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let email = payload.email.trim().to_lowercase();

    let user = store::users::find_by_email(&pool, &email)
        .await?
        .ok_or(AppError::AuthenticationFailed)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthenticationFailed);
    }

    let token = token::issue(&pool, user.id, &config.jwt_secret).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { user, token }))
}

/// Returns the caller's own profile, as resolved by the authorization gate.
#[get("/me")]
pub async fn profile(session: AuthSession) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(session.user))
}

/// Partially updates the caller's profile.
///
/// Permitted keys: name, email, password, age. Any other key rejects the
/// whole patch. A changed password is re-hashed before it is persisted.
#[patch("/me")]
pub async fn update_profile(
    pool: web::Data<PgPool>,
    session: AuthSession,
    body: web::Json<serde_json::Value>,
) -> Result<impl Responder, AppError> {
    let mut patch: UserPatch = super::parse_patch(body.into_inner(), &user::ALLOWED_UPDATES)?;
    patch.normalize();
    patch.validate()?;

    let mut user = session.user;

    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(email) = patch.email {
        if email != user.email
            && store::users::find_by_email(&pool, &email).await?.is_some()
        {
            return Err(AppError::ValidationError("email is already in use".into()));
        }
        user.email = email;
    }
    if let Some(password) = patch.password {
        user.password = hash_password(&password)?;
    }
    if let Some(age) = patch.age {
        user.age = age;
    }

    let user = store::users::update(&pool, &user).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Ends the current session only; tokens held by other devices keep working.
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    token::revoke(&pool, session.user.id, &session.token).await?;

    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

/// Ends every session the caller has.
#[post("/logoutall")]
pub async fn logout_all(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    token::revoke_all(&pool, session.user.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

/// Deletes the caller's account along with every task they own.
#[delete("/me")]
pub async fn delete_account(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    // Tasks reference their owner, so child rows go first.
    store::tasks::delete_all_for_owner(&pool, session.user.id).await?;
    store::users::delete(&pool, session.user.id).await?;

    Ok(HttpResponse::Ok().json(session.user))
}
