//! Column/value maps used to create, update and match entity rows.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CoreError;

/// A stored row: column name to JSON value, in column order.
pub type Record = Map<String, Value>;

/// Ordered column/value pairs passed to create, update and match operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Record);

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder method to set a column.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Build attributes from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::InvalidAttributes(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }

    /// Build attributes from any serializable struct or map.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, CoreError> {
        let value =
            serde_json::to_value(value).map_err(|e| CoreError::Serialization(e.to_string()))?;
        Self::from_value(value)
    }

    /// Set a column, returning the previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.0.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Return `self` overlaid with `other`; columns in `other` win.
    pub fn merged(&self, other: &Attributes) -> Attributes {
        let mut merged = self.clone();
        for (column, value) in other.iter() {
            merged.0.insert(column.clone(), value.clone());
        }
        merged
    }

    /// Get the underlying record.
    pub fn as_record(&self) -> &Record {
        &self.0
    }

    /// Consume and return the underlying record.
    pub fn into_record(self) -> Record {
        self.0
    }
}

impl From<Record> for Attributes {
    fn from(record: Record) -> Self {
        Self(record)
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Attributes {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Column projection for read operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    /// Every column (`*`).
    #[default]
    All,
    /// Only the listed columns.
    Only(Vec<String>),
}

impl Columns {
    /// Project onto the given column names.
    pub fn only<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(columns.into_iter().map(Into::into).collect())
    }

    /// Strip every column not selected by this projection.
    pub fn project(&self, record: Record) -> Record {
        match self {
            Self::All => record,
            Self::Only(columns) => record
                .into_iter()
                .filter(|(column, _)| columns.iter().any(|c| c == column))
                .collect(),
        }
    }
}
