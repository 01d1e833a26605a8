use crate::error::AppError;
use crate::models::Task;
use sqlx::PgPool;
use uuid::Uuid;

/// Inserts a task for the given owner. The owner id comes from the
/// authenticated session, never from the request body.
pub async fn insert(
    pool: &PgPool,
    description: &str,
    completed: bool,
    owner: i32,
) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, description, completed, owner)
         VALUES ($1, $2, $3, $4)
         RETURNING id, description, completed, owner, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(description)
    .bind(completed)
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Lists the owner's tasks, newest first, optionally restricted by
/// completion state.
pub async fn list_for_owner(
    pool: &PgPool,
    owner: i32,
    completed: Option<bool>,
) -> Result<Vec<Task>, AppError> {
    let tasks = match completed {
        Some(completed) => {
            sqlx::query_as::<_, Task>(
                "SELECT id, description, completed, owner, created_at, updated_at
                 FROM tasks WHERE owner = $1 AND completed = $2
                 ORDER BY created_at DESC",
            )
            .bind(owner)
            .bind(completed)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Task>(
                "SELECT id, description, completed, owner, created_at, updated_at
                 FROM tasks WHERE owner = $1
                 ORDER BY created_at DESC",
            )
            .bind(owner)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(tasks)
}

/// Fetches one task scoped to its owner. A task owned by someone else is
/// `None`, indistinguishable from one that does not exist.
pub async fn find_for_owner(pool: &PgPool, id: Uuid, owner: i32) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, description, completed, owner, created_at, updated_at
         FROM tasks WHERE id = $1 AND owner = $2",
    )
    .bind(id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Persists the mutable task fields, still scoped to the owner.
pub async fn update(pool: &PgPool, task: &Task) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET description = $3, completed = $4, updated_at = now()
         WHERE id = $1 AND owner = $2
         RETURNING id, description, completed, owner, created_at, updated_at",
    )
    .bind(task.id)
    .bind(task.owner)
    .bind(&task.description)
    .bind(task.completed)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Deletes one task scoped to its owner, returning the deleted row if there
/// was one.
pub async fn delete_for_owner(
    pool: &PgPool,
    id: Uuid,
    owner: i32,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "DELETE FROM tasks WHERE id = $1 AND owner = $2
         RETURNING id, description, completed, owner, created_at, updated_at",
    )
    .bind(id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Removes every task the owner has. Called before the owner's own row is
/// deleted, since tasks reference their user.
pub async fn delete_all_for_owner(pool: &PgPool, owner: i32) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE owner = $1")
        .bind(owner)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
