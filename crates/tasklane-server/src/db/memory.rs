//! In-process storage backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tasklane_core::Record;
use tokio::sync::RwLock;
use tracing::debug;

use super::store::{Query, Store, StoreError};

/// One table: rows keyed by id, plus the next id to hand out.
#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Record>,
}

impl Table {
    fn matching<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = (&'a i64, &'a Record)> {
        self.rows.iter().filter(move |(_, row)| query.matches(row))
    }
}

/// Storage backend holding every table in memory.
///
/// Ids start at 1 and are never reused, even after deletes.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of physical rows in a table, trashed rows included.
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |t| t.rows.len())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: &str, mut row: Record) -> Result<Record, StoreError> {
        let mut tables = self.tables.write().await;
        let t = tables.entry(table.to_string()).or_default();

        t.next_id += 1;
        let id = t.next_id;
        row.insert("id".to_string(), Value::from(id));
        t.rows.insert(id, row.clone());

        debug!(table, id, "Row inserted");
        Ok(row)
    }

    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        let Some(t) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<Record> = t.matching(query).map(|(_, row)| row.clone()).collect();
        if !query.order.is_empty() {
            rows.sort_by(|a, b| query.compare(a, b));
        }

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map_or(0, |t| t.matching(query).count() as u64))
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        changes: &Record,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(t) = tables.get_mut(table) else {
            return Ok(0);
        };

        let mut affected = 0;
        for row in t.rows.values_mut().filter(|row| query.matches(row)) {
            for (column, value) in changes {
                if column != "id" {
                    row.insert(column.clone(), value.clone());
                }
            }
            affected += 1;
        }

        debug!(table, affected, "Rows updated");
        Ok(affected)
    }

    async fn delete(&self, table: &str, query: &Query) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(t) = tables.get_mut(table) else {
            return Ok(0);
        };

        let before = t.rows.len();
        t.rows.retain(|_, row| !query.matches(row));
        let affected = (before - t.rows.len()) as u64;

        debug!(table, affected, "Rows deleted");
        Ok(affected)
    }
}
