pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;
use serde::de::DeserializeOwned;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware)
            .service(users::register)
            .service(users::login)
            .service(users::logout)
            .service(users::logout_all)
            .service(users::profile)
            .service(users::update_profile)
            .service(users::delete_account),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

/// Checks a patch body against an allow-list of field names, then
/// deserializes it. Any key outside the allow-list rejects the whole patch
/// before a single field is applied.
pub(crate) fn parse_patch<T: DeserializeOwned>(
    body: serde_json::Value,
    allowed: &[&str],
) -> Result<T, AppError> {
    {
        let map = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("expected a JSON object".into()))?;

        let unknown: Vec<String> = map
            .keys()
            .filter(|key| !allowed.contains(&key.as_str()))
            .cloned()
            .collect();

        if !unknown.is_empty() {
            return Err(AppError::InvalidUpdateFields(unknown));
        }
    }

    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}
