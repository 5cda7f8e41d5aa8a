//! Task entity.

use crate::{Id, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Task represents a unit of work tracked by the application.
///
/// Every field has a default so that rows read with a column projection
/// still hydrate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// Storage-assigned identifier.
    pub id: Id,

    /// Short title.
    pub title: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Current task status.
    pub status: TaskStatus,

    /// When the row was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the row was last updated.
    pub updated_at: Option<DateTime<Utc>>,

    /// When the row was soft-deleted, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_row_hydrates_with_defaults() {
        let task: Task = serde_json::from_value(json!({"id": 3, "status": 2})).unwrap();

        assert_eq!(task.id, Id::new(3));
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.title.is_empty());
        assert_eq!(task.deleted_at, None);
    }

    #[test]
    fn test_serialization_omits_missing_deleted_at() {
        let task = Task {
            id: Id::new(1),
            title: "Write docs".to_string(),
            ..Task::default()
        };
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["title"], "Write docs");
        assert_eq!(value["status"], 0);
        assert!(value.get("deleted_at").is_none());
    }
}
