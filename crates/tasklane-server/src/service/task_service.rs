//! TaskService implementation.

use async_trait::async_trait;
use tracing::info;

use tasklane_core::{Attributes, Columns, Id, Task};

use crate::db::{Page, TaskRepository};
use crate::service::ServiceError;
use crate::validation::FieldErrors;

/// Operations on tasks exposed to the HTTP layer.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// The task with `id`, or `None`.
    async fn get_task_by_id(&self, id: Id) -> Result<Option<Task>, ServiceError>;

    async fn get_all_tasks(&self) -> Result<Vec<Task>, ServiceError>;

    /// One page of tasks; `simple` skips the total count.
    async fn paginate_tasks(&self, page: u64, simple: bool) -> Result<Page<Task>, ServiceError>;

    async fn create_task(&self, attributes: Attributes) -> Result<Task, ServiceError>;

    /// Returns the number of rows updated.
    async fn update_task(&self, id: Id, attributes: Attributes) -> Result<u64, ServiceError>;

    /// Fails with not-found when the task does not exist.
    async fn delete_task(&self, id: Id) -> Result<bool, ServiceError>;
}

/// TaskService backed by a task repository.
pub struct TaskServiceImpl {
    repository: TaskRepository,
}

impl TaskServiceImpl {
    /// Create a new TaskServiceImpl.
    pub fn new(repository: TaskRepository) -> Self {
        Self { repository }
    }
}

fn require_fields(attributes: &Attributes) -> Result<(), ServiceError> {
    if attributes.is_empty() {
        return Err(ServiceError::Validation(
            FieldErrors::new().with("body", "At least one field is required."),
        ));
    }
    Ok(())
}

#[async_trait]
impl TaskService for TaskServiceImpl {
    async fn get_task_by_id(&self, id: Id) -> Result<Option<Task>, ServiceError> {
        Ok(self.repository.get_by_id(id, &Columns::All).await?)
    }

    async fn get_all_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.repository.get_all(&Columns::All).await?)
    }

    async fn paginate_tasks(&self, page: u64, simple: bool) -> Result<Page<Task>, ServiceError> {
        let page = if simple {
            self.repository.simple_paginate(page).await?
        } else {
            self.repository.paginate(page).await?
        };
        Ok(page)
    }

    async fn create_task(&self, attributes: Attributes) -> Result<Task, ServiceError> {
        require_fields(&attributes)?;

        let task = self.repository.create(attributes).await?;
        info!(task_id = %task.id, status = task.status.label(), "Task created");
        Ok(task)
    }

    async fn update_task(&self, id: Id, attributes: Attributes) -> Result<u64, ServiceError> {
        require_fields(&attributes)?;

        let updated = self.repository.update_by_id(id, attributes).await?;
        info!(task_id = %id, updated, "Task updated");
        Ok(updated)
    }

    async fn delete_task(&self, id: Id) -> Result<bool, ServiceError> {
        let deleted = self.repository.delete_by_id(id).await?;
        info!(task_id = %id, "Task deleted");
        Ok(deleted)
    }
}
