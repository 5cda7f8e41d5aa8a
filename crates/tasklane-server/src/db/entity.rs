//! Entity bindings and row translation.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tasklane_core::{Attributes, Columns, Id, Record, Task};

use super::error::RepositoryError;

/// Column stamped when a row is inserted.
pub const CREATED_AT: &str = "created_at";
/// Column stamped whenever a row is written.
pub const UPDATED_AT: &str = "updated_at";
/// Soft-delete marker column.
pub const DELETED_AT: &str = "deleted_at";

/// A type stored as rows of one table.
///
/// Implementations must deserialize from partial rows (column projections),
/// typically with `#[serde(default)]`.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table the entity is bound to.
    const TABLE: &'static str;

    /// Name used in error messages.
    const NAME: &'static str;

    /// Whether deletes mark `deleted_at` instead of removing the row.
    const SOFT_DELETES: bool = false;

    /// Whether `created_at`/`updated_at` are maintained.
    const TIMESTAMPS: bool = true;

    /// Storage-assigned identifier.
    fn id(&self) -> Id;
}

impl Entity for Task {
    const TABLE: &'static str = "tasks";
    const NAME: &'static str = "Task";
    const SOFT_DELETES: bool = true;

    fn id(&self) -> Id {
        self.id
    }
}

/// Current time in the fixed-width form stored in timestamp columns.
///
/// Fixed width keeps lexicographic order equal to chronological order.
pub fn now_timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Build the row to insert for `attributes`.
pub(crate) fn insert_row<E: Entity>(attributes: Attributes) -> Record {
    let mut row = attributes.into_record();
    row.remove("id");
    if E::TIMESTAMPS {
        let now = now_timestamp();
        row.entry(CREATED_AT).or_insert_with(|| now.clone());
        row.insert(UPDATED_AT.to_string(), now);
    }
    row
}

/// Build the changes to apply for `attributes`.
pub(crate) fn update_changes<E: Entity>(attributes: &Attributes) -> Record {
    let mut changes = attributes.as_record().clone();
    changes.remove("id");
    if E::TIMESTAMPS {
        changes.insert(UPDATED_AT.to_string(), now_timestamp());
    }
    changes
}

/// Translate a stored row into an entity.
pub(crate) fn hydrate<E: Entity>(row: Record, columns: &Columns) -> Result<E, RepositoryError> {
    let row = columns.project(row);
    Ok(serde_json::from_value(Value::Object(row))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tasklane_core::TaskStatus;

    #[test]
    fn test_insert_row_strips_id_and_stamps_timestamps() {
        let attrs = Attributes::new().with("id", 10).with("title", "x");
        let row = insert_row::<Task>(attrs);

        assert!(!row.contains_key("id"));
        assert!(row.contains_key(CREATED_AT));
        assert_eq!(row[CREATED_AT], row[UPDATED_AT]);
    }

    #[test]
    fn test_hydrate_with_projection() {
        let row = Attributes::from_value(json!({"id": 4, "title": "t", "status": 1}))
            .unwrap()
            .into_record();

        let task: Task = hydrate(row, &Columns::only(["id", "status"])).unwrap();
        assert_eq!(task.id, Id::new(4));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.title, "");
    }

    #[test]
    fn test_hydrate_rejects_bad_status() {
        let row = Attributes::from_value(json!({"id": 4, "status": 12}))
            .unwrap()
            .into_record();

        let result: Result<Task, _> = hydrate(row, &Columns::All);
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }
}
