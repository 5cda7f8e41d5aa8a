//! HTTP request handlers.

mod health;
mod tasks;

pub use health::{health_check, method_not_allowed, not_found};
pub use tasks::{destroy, index, show, store, update};
