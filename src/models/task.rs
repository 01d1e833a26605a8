use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Field names a task patch may carry; anything else is rejected outright.
pub const ALLOWED_UPDATES: [&str; 2] = ["description", "completed"];

/// A task entity as stored in the database and returned by the API.
///
/// `owner` is set once at creation, always to the authenticated caller, and
/// never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    pub owner: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
///
/// There is deliberately no `owner` field here: any owner value a client
/// sends is dropped at deserialization and the store stamps the caller's id.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: String,
    pub completed: Option<bool>,
}

impl TaskInput {
    pub fn normalize(&mut self) {
        self.description = self.description.trim().to_string();
    }
}

/// Partial update for a task. Key filtering against [`ALLOWED_UPDATES`]
/// happens before deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn normalize(&mut self) {
        if let Some(description) = &mut self.description {
            *description = description.trim().to_string();
        }
    }
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Restrict the listing to completed (or uncompleted) tasks.
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_input_validation() {
        let mut valid = TaskInput {
            description: "  write spec  ".to_string(),
            completed: None,
        };
        valid.normalize();
        assert_eq!(valid.description, "write spec");
        assert!(valid.validate().is_ok());

        let mut whitespace_only = TaskInput {
            description: "   ".to_string(),
            completed: Some(true),
        };
        whitespace_only.normalize();
        assert!(
            whitespace_only.validate().is_err(),
            "Validation should fail for a blank description."
        );
    }

    #[test]
    fn test_task_input_ignores_client_owner() {
        // An owner field in the request body must not reach the model.
        let input: TaskInput = serde_json::from_value(serde_json::json!({
            "description": "write spec",
            "owner": 999
        }))
        .unwrap();
        assert_eq!(input.description, "write spec");
    }

    #[test]
    fn test_task_patch_validation() {
        let valid = TaskPatch {
            description: Some("revise spec".to_string()),
            completed: Some(true),
        };
        assert!(valid.validate().is_ok());

        let empty_description = TaskPatch {
            description: Some("".to_string()),
            completed: None,
        };
        assert!(empty_description.validate().is_err());
    }
}
