//! Composable queries over one entity's table.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};
use tasklane_core::{Attributes, Columns};

use super::entity::{hydrate, insert_row, now_timestamp, update_changes, Entity, DELETED_AT};
use super::error::RepositoryError;
use super::paginator::Page;
use super::store::{Direction, Filter, Query, Store};

/// Query builder bound to the table of `E`.
///
/// Soft-deleted rows are excluded unless `with_trashed` is called.
pub struct QueryBuilder<E> {
    store: Arc<dyn Store>,
    query: Query,
    columns: Columns,
    with_trashed: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> QueryBuilder<E> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            query: Query::new(),
            columns: Columns::All,
            with_trashed: false,
            _entity: PhantomData,
        }
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.filters.push(Filter::Eq(column.into(), value.into()));
        self
    }

    pub fn where_in<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.query.filters.push(Filter::In(column.into(), values));
        self
    }

    pub fn where_null(mut self, column: impl Into<String>) -> Self {
        self.query.filters.push(Filter::IsNull(column.into()));
        self
    }

    /// Match every column/value pair of `attributes`.
    pub fn where_attributes(self, attributes: &Attributes) -> Self {
        attributes
            .iter()
            .fold(self, |builder, (column, value)| builder.where_eq(column.clone(), value.clone()))
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.query.order.push((column.into(), direction));
        self
    }

    /// Newest first by `column`, ties broken by descending id.
    pub fn latest(self, column: impl Into<String>) -> Self {
        self.order_by(column, Direction::Desc)
            .order_by("id", Direction::Desc)
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Project results onto a subset of columns.
    pub fn select(mut self, columns: Columns) -> Self {
        self.columns = columns;
        self
    }

    /// Include soft-deleted rows.
    pub fn with_trashed(mut self) -> Self {
        self.with_trashed = true;
        self
    }

    /// The row-level query as sent to the store.
    pub fn to_query(&self) -> Query {
        let mut query = self.query.clone();
        if E::SOFT_DELETES && !self.with_trashed {
            query.filters.push(Filter::IsNull(DELETED_AT.to_string()));
        }
        query
    }

    /// Fetch every matching entity.
    pub async fn get(self) -> Result<Vec<E>, RepositoryError> {
        let rows = self.store.select(E::TABLE, &self.to_query()).await?;
        rows.into_iter()
            .map(|row| hydrate(row, &self.columns))
            .collect()
    }

    /// Fetch the first matching entity.
    pub async fn first(self) -> Result<Option<E>, RepositoryError> {
        Ok(self.limit(1).get().await?.into_iter().next())
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self
            .store
            .count(E::TABLE, &self.to_query().without_window())
            .await?)
    }

    pub async fn exists(&self) -> Result<bool, RepositoryError> {
        Ok(self.count().await? > 0)
    }

    /// Insert a new row built from `attributes`.
    pub async fn insert(&self, attributes: Attributes) -> Result<E, RepositoryError> {
        let row = self.store.insert(E::TABLE, insert_row::<E>(attributes)).await?;
        hydrate(row, &Columns::All)
    }

    /// Apply `attributes` to every matching row. Returns rows affected.
    pub async fn update(&self, attributes: &Attributes) -> Result<u64, RepositoryError> {
        let changes = update_changes::<E>(attributes);
        Ok(self.store.update(E::TABLE, &self.to_query(), &changes).await?)
    }

    /// Delete every matching row; soft-deleting entities are only marked.
    pub async fn delete(&self) -> Result<u64, RepositoryError> {
        if E::SOFT_DELETES {
            let mut changes = Map::new();
            changes.insert(DELETED_AT.to_string(), now_timestamp());
            let query = self.to_query();
            return Ok(self.store.update(E::TABLE, &query, &changes).await?);
        }
        Ok(self.store.delete(E::TABLE, &self.to_query()).await?)
    }

    /// Physically remove every matching row, trashed or not.
    pub async fn force_delete(&self) -> Result<u64, RepositoryError> {
        Ok(self.store.delete(E::TABLE, &self.query).await?)
    }

    /// Fetch one fully counted page. `page` is 1-based.
    pub async fn paginate(self, per_page: u64, page: u64) -> Result<Page<E>, RepositoryError> {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total = self.count().await?;
        let items = self
            .offset((page - 1).saturating_mul(per_page))
            .limit(per_page)
            .get()
            .await?;
        Ok(Page::length_aware(items, total, per_page, page))
    }

    /// Fetch one page without counting the total.
    ///
    /// Reads one extra row to learn whether a next page exists.
    pub async fn simple_paginate(
        self,
        per_page: u64,
        page: u64,
    ) -> Result<Page<E>, RepositoryError> {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let mut items = self
            .offset((page - 1).saturating_mul(per_page))
            .limit(per_page.saturating_add(1))
            .get()
            .await?;
        let has_more = items.len() as u64 > per_page;
        items.truncate(per_page as usize);
        Ok(Page::simple(items, per_page, page, has_more))
    }
}
