use crate::{
    auth::AuthSession,
    error::AppError,
    models::{task, TaskInput, TaskPatch, TaskQuery},
    store,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Lists the caller's tasks, newest first.
///
/// `?completed=true` or `?completed=false` restricts the listing; without
/// the parameter every task the caller owns is returned. Nobody else's
/// tasks are ever visible here.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    session: AuthSession,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = store::tasks::list_for_owner(&pool, session.user.id, query.completed).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller.
///
/// The owner is always the authenticated user. A client-supplied `owner`
/// value in the body is dropped before it can reach the store.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let mut payload = payload.into_inner();
    payload.normalize();
    payload.validate()?;

    let task = store::tasks::insert(
        &pool,
        &payload.description,
        payload.completed.unwrap_or(false),
        session.user.id,
    )
    .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Fetches one of the caller's tasks by id.
///
/// A task owned by someone else yields the same 404 as a task that does not
/// exist.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = store::tasks::find_for_owner(&pool, task_id.into_inner(), session.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates one of the caller's tasks.
///
/// Permitted keys: description, completed. Any other key rejects the whole
/// patch, leaving the task untouched.
#[patch("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
    body: web::Json<serde_json::Value>,
) -> Result<impl Responder, AppError> {
    let mut patch: TaskPatch = super::parse_patch(body.into_inner(), &task::ALLOWED_UPDATES)?;
    patch.normalize();
    patch.validate()?;

    let mut task = store::tasks::find_for_owner(&pool, task_id.into_inner(), session.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(completed) = patch.completed {
        task.completed = completed;
    }

    let task = store::tasks::update(&pool, &task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks, returning the deleted task.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = store::tasks::delete_for_owner(&pool, task_id.into_inner(), session.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}
