//! Tasklane Server Library
//!
//! This crate provides the task-management HTTP service: a generic
//! repository over pluggable storage, the task service layer, and the
//! response envelope every endpoint speaks.

pub mod config;
pub mod db;
pub mod http;
pub mod i18n;
pub mod service;
pub mod state;
pub mod validation;

pub use config::Config;
pub use db::{MemoryStore, Repository, TaskRepository};
pub use http::envelope::{Envelope, Payload};
pub use service::{TaskService, TaskServiceImpl};
pub use state::AppState;
