//! Storage backend contract and the row-level query it executes.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use tasklane_core::Record;
use thiserror::Error;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend is unavailable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Sort direction for an ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals value. A missing column reads as `null`.
    Eq(String, Value),
    /// Column equals any of the values.
    In(String, Vec<Value>),
    /// Column is missing or `null`.
    IsNull(String),
}

impl Filter {
    /// Check whether a row satisfies this predicate.
    pub fn matches(&self, row: &Record) -> bool {
        match self {
            Self::Eq(column, value) => column_value(row, column) == value,
            Self::In(column, values) => {
                let current = column_value(row, column);
                values.iter().any(|v| v == current)
            }
            Self::IsNull(column) => column_value(row, column).is_null(),
        }
    }
}

/// Filters, ordering and window applied to one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Vec<(String, Direction)>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a row against every filter.
    pub fn matches(&self, row: &Record) -> bool {
        self.filters.iter().all(|filter| filter.matches(row))
    }

    /// Compare two rows by the ordering keys.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for (column, direction) in &self.order {
            let ordering = compare_values(column_value(a, column), column_value(b, column));
            let ordering = match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Same filters with ordering and window dropped, for counting.
    pub fn without_window(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            ..Self::default()
        }
    }
}

fn column_value<'a>(row: &'a Record, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

/// Total order over JSON values: null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// A table-oriented storage backend.
///
/// Rows are JSON objects. The backend owns the `id` column: it assigns a
/// fresh integer id on every insert.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a row and return it as stored, including its new `id`.
    async fn insert(&self, table: &str, row: Record) -> Result<Record, StoreError>;

    /// Rows matching the query, ordered and windowed.
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Number of rows matching the query filters.
    async fn count(&self, table: &str, query: &Query) -> Result<u64, StoreError>;

    /// Overwrite `changes` on every matching row. Returns rows affected.
    async fn update(&self, table: &str, query: &Query, changes: &Record) -> Result<u64, StoreError>;

    /// Remove every matching row. Returns rows affected.
    async fn delete(&self, table: &str, query: &Query) -> Result<u64, StoreError>;
}
