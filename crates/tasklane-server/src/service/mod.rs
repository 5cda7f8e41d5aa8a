//! Service layer between HTTP handlers and repositories.

pub mod error;
pub mod task_service;

pub use error::ServiceError;
pub use task_service::{TaskService, TaskServiceImpl};
