//! Data access: storage backends, the generic repository and pagination.

pub mod entity;
pub mod error;
pub mod memory;
pub mod paginator;
pub mod query;
pub mod repository;
pub mod store;

pub use entity::Entity;
pub use error::RepositoryError;
pub use memory::MemoryStore;
pub use paginator::Page;
pub use query::QueryBuilder;
pub use repository::{Repository, RepositoryConfig, TaskRepository, DEFAULT_ITEMS_PER_PAGE};
pub use store::{Direction, Filter, Query, Store, StoreError};
