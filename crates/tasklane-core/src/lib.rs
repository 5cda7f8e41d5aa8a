//! Tasklane Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage backends
//! - Runtime specifics
//!
//! All types here represent the core business domain of Tasklane.

pub mod attributes;
pub mod error;
pub mod ids;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use attributes::{Attributes, Columns, Record};
pub use error::CoreError;
pub use ids::Id;
pub use status::TaskStatus;
pub use task::Task;
