//! Generic repository over one entity type.
//!
//! `Repository<E>` is implemented once and instantiated per entity:
//!
//! ```ignore
//! pub type TaskRepository = Repository<Task>;
//! ```
//!
//! Lookups come in two shapes: `get_by_id` and friends return `Option`,
//! `find_or_fail` returns `RepositoryError::NotFound`.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tasklane_core::{Attributes, Columns, Id, Task};
use tracing::debug;

use super::entity::{Entity, CREATED_AT};
use super::error::RepositoryError;
use super::paginator::Page;
use super::query::QueryBuilder;
use super::store::{Direction, Store};

/// Repository bound to tasks.
pub type TaskRepository = Repository<Task>;

/// Default page size for pagination-aware call sites.
pub const DEFAULT_ITEMS_PER_PAGE: u64 = 15;

/// Repository settings supplied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Page size used by `paginate` and `simple_paginate`.
    pub items_per_page: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Data access for the table bound to `E`.
pub struct Repository<E> {
    store: Arc<dyn Store>,
    config: RepositoryConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    /// Create a repository with the default configuration.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    pub fn with_config(store: Arc<dyn Store>, config: RepositoryConfig) -> Self {
        Self {
            store,
            config,
            _entity: PhantomData,
        }
    }

    pub fn items_per_page(&self) -> u64 {
        self.config.items_per_page
    }

    /// Start a query against the entity's table.
    pub fn query(&self) -> QueryBuilder<E> {
        QueryBuilder::new(self.store.clone())
    }

    /// Every row, projected to `columns`.
    pub async fn get_all(&self, columns: &Columns) -> Result<Vec<E>, RepositoryError> {
        self.query().select(columns.clone()).get().await
    }

    /// The row with `id`, or `None`.
    pub async fn get_by_id(&self, id: Id, columns: &Columns) -> Result<Option<E>, RepositoryError> {
        self.query()
            .where_eq("id", id)
            .select(columns.clone())
            .first()
            .await
    }

    /// Rows whose id is in `ids`, ascending by id.
    pub async fn get_by_ids(&self, ids: &[Id]) -> Result<Vec<E>, RepositoryError> {
        self.query()
            .where_in("id", ids.iter().copied())
            .order_by("id", Direction::Asc)
            .get()
            .await
    }

    /// Insert a row and return the stored entity.
    pub async fn create(&self, attributes: Attributes) -> Result<E, RepositoryError> {
        let entity = self.query().insert(attributes).await?;
        debug!(entity = E::NAME, id = %entity.id(), "Entity created");
        Ok(entity)
    }

    /// The first row matching `attributes`, created from them if absent.
    pub async fn first_or_create(&self, attributes: Attributes) -> Result<E, RepositoryError> {
        self.first_by_or_create_by(attributes, Attributes::new())
            .await
    }

    /// The first row matching `first_by`; if absent, create one from
    /// `first_by` merged with `attributes`.
    pub async fn first_by_or_create_by(
        &self,
        first_by: Attributes,
        attributes: Attributes,
    ) -> Result<E, RepositoryError> {
        if let Some(existing) = self.query().where_attributes(&first_by).first().await? {
            return Ok(existing);
        }
        self.create(first_by.merged(&attributes)).await
    }

    /// Update the row with `id`. Returns rows affected.
    pub async fn update_by_id(
        &self,
        id: Id,
        attributes: Attributes,
    ) -> Result<u64, RepositoryError> {
        self.query().where_eq("id", id).update(&attributes).await
    }

    /// Update the row backing `entity` and refresh `entity` from storage.
    ///
    /// Returns `false` if the row no longer exists.
    pub async fn update_by_entity(
        &self,
        entity: &mut E,
        attributes: Attributes,
    ) -> Result<bool, RepositoryError> {
        let id = entity.id();
        if self.update_by_id(id, attributes).await? == 0 {
            return Ok(false);
        }
        match self.get_by_id(id, &Columns::All).await? {
            Some(fresh) => {
                *entity = fresh;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Update every row whose id is in `ids`. Returns rows affected.
    pub async fn update_by_ids(
        &self,
        ids: &[Id],
        attributes: Attributes,
    ) -> Result<u64, RepositoryError> {
        self.query()
            .where_in("id", ids.iter().copied())
            .update(&attributes)
            .await
    }

    /// Delete the row with `id`.
    ///
    /// Deleting a missing row is an error, not a no-op.
    pub async fn delete_by_id(&self, id: Id) -> Result<bool, RepositoryError> {
        let deleted = self.query().where_eq("id", id).delete().await?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound { entity: E::NAME, id });
        }
        debug!(entity = E::NAME, id = %id, "Entity deleted");
        Ok(true)
    }

    /// Delete every row whose id is in `ids`. Returns rows affected.
    pub async fn delete_by_ids(&self, ids: &[Id]) -> Result<u64, RepositoryError> {
        self.query()
            .where_in("id", ids.iter().copied())
            .delete()
            .await
    }

    /// Physically remove the row with `id`, even if soft-deleted.
    pub async fn force_delete_by_id(&self, id: Id) -> Result<bool, RepositoryError> {
        let removed = self.query().where_eq("id", id).force_delete().await?;
        Ok(removed > 0)
    }

    /// The first row where `key` equals `value`.
    pub async fn first_by_key_value(
        &self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<Option<E>, RepositoryError> {
        self.query().where_eq(key, value).first().await
    }

    /// The row with `id`, or `RepositoryError::NotFound`.
    pub async fn find_or_fail(&self, id: Id) -> Result<E, RepositoryError> {
        self.get_by_id(id, &Columns::All)
            .await?
            .ok_or(RepositoryError::NotFound { entity: E::NAME, id })
    }

    /// The most recent row by `column`.
    pub async fn latest_by(&self, column: &str) -> Result<Option<E>, RepositoryError> {
        self.query().latest(column).first().await
    }

    /// `latest_by` on the creation timestamp.
    pub async fn latest(&self) -> Result<Option<E>, RepositoryError> {
        self.latest_by(CREATED_AT).await
    }

    /// Update the first row matching `where_` with `values`, or create one
    /// from both when none matches.
    pub async fn update_or_create(
        &self,
        where_: Attributes,
        values: Attributes,
    ) -> Result<E, RepositoryError> {
        match self.query().where_attributes(&where_).first().await? {
            Some(mut existing) => {
                self.update_by_entity(&mut existing, values).await?;
                Ok(existing)
            }
            None => self.create(where_.merged(&values)).await,
        }
    }

    /// One fully counted page of `items_per_page` rows.
    pub async fn paginate(&self, page: u64) -> Result<Page<E>, RepositoryError> {
        self.query()
            .paginate(self.config.items_per_page, page)
            .await
    }

    /// One page of `items_per_page` rows without a total count.
    pub async fn simple_paginate(&self, page: u64) -> Result<Page<E>, RepositoryError> {
        self.query()
            .simple_paginate(self.config.items_per_page, page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tasklane_core::TaskStatus;

    /// Hard-deleting entity without timestamps.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Tag {
        id: Id,
        name: String,
    }

    impl Entity for Tag {
        const TABLE: &'static str = "tags";
        const NAME: &'static str = "Tag";
        const TIMESTAMPS: bool = false;

        fn id(&self) -> Id {
            self.id
        }
    }

    fn repository() -> (Arc<MemoryStore>, TaskRepository) {
        let store = Arc::new(MemoryStore::new());
        let repository = TaskRepository::new(store.clone());
        (store, repository)
    }

    fn task(title: &str, status: TaskStatus) -> Attributes {
        Attributes::new().with("title", title).with("status", status)
    }

    #[tokio::test]
    async fn test_create_then_get_by_id_round_trips() {
        let (_, repo) = repository();
        let created = repo.create(task("Write docs", TaskStatus::Pending)).await.unwrap();

        assert_eq!(created.id, Id::new(1));
        assert!(created.created_at.is_some());

        let fetched = repo.get_by_id(created.id, &Columns::All).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_absent_id_is_none_or_not_found() {
        let (_, repo) = repository();

        assert_eq!(repo.get_by_id(Id::new(999), &Columns::All).await.unwrap(), None);

        let err = repo.find_or_fail(Id::new(999)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Task not found: 999");
    }

    #[tokio::test]
    async fn test_get_all_with_projection() {
        let (_, repo) = repository();
        repo.create(task("a", TaskStatus::Failed)).await.unwrap();
        repo.create(task("b", TaskStatus::Pending)).await.unwrap();

        let all = repo.get_all(&Columns::All).await.unwrap();
        assert_eq!(all.len(), 2);

        let projected = repo.get_all(&Columns::only(["status"])).await.unwrap();
        assert_eq!(projected[0].status, TaskStatus::Failed);
        assert_eq!(projected[0].title, "");
        assert_eq!(projected[0].id, Id::default());
    }

    #[tokio::test]
    async fn test_get_by_ids_is_ascending() {
        let (_, repo) = repository();
        for title in ["a", "b", "c", "d"] {
            repo.create(task(title, TaskStatus::Pending)).await.unwrap();
        }

        let found = repo
            .get_by_ids(&[Id::new(3), Id::new(1), Id::new(2)])
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_first_or_create_reuses_match() {
        let (store, repo) = repository();
        let first = repo.first_or_create(task("a", TaskStatus::Pending)).await.unwrap();
        let second = repo.first_or_create(task("a", TaskStatus::Pending)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.row_count("tasks").await, 1);
    }

    #[tokio::test]
    async fn test_first_by_or_create_by_merges_on_create() {
        let (_, repo) = repository();
        let match_on = Attributes::new().with("title", "deploy");
        let extra = Attributes::new()
            .with("status", TaskStatus::InProgress)
            .with("description", "ship it");

        let created = repo
            .first_by_or_create_by(match_on.clone(), extra.clone())
            .await
            .unwrap();
        assert_eq!(created.status, TaskStatus::InProgress);
        assert_eq!(created.description.as_deref(), Some("ship it"));

        let again = repo.first_by_or_create_by(match_on, extra).await.unwrap();
        assert_eq!(again.id, created.id);
    }

    #[tokio::test]
    async fn test_update_operations() {
        let (_, repo) = repository();
        for title in ["a", "b", "c"] {
            repo.create(task(title, TaskStatus::Pending)).await.unwrap();
        }

        let completed = Attributes::new().with("status", TaskStatus::Completed);
        assert_eq!(repo.update_by_id(Id::new(1), completed.clone()).await.unwrap(), 1);
        assert_eq!(repo.update_by_id(Id::new(42), completed.clone()).await.unwrap(), 0);
        assert_eq!(
            repo.update_by_ids(&[Id::new(2), Id::new(3), Id::new(9)], completed)
                .await
                .unwrap(),
            2
        );

        let all = repo.get_all(&Columns::All).await.unwrap();
        assert!(all.iter().all(|t| t.status == TaskStatus::Completed));
    }

    #[tokio::test]
    async fn test_update_by_entity_refreshes_entity() {
        let (_, repo) = repository();
        let mut entity = repo.create(task("a", TaskStatus::Pending)).await.unwrap();

        let updated = repo
            .update_by_entity(&mut entity, Attributes::new().with("title", "renamed"))
            .await
            .unwrap();
        assert!(updated);
        assert_eq!(entity.title, "renamed");

        repo.force_delete_by_id(entity.id).await.unwrap();
        let updated = repo
            .update_by_entity(&mut entity, Attributes::new().with("title", "gone"))
            .await
            .unwrap();
        assert!(!updated);
        assert_eq!(entity.title, "renamed");
    }

    #[tokio::test]
    async fn test_delete_by_id_soft_deletes_and_errors_when_absent() {
        let (store, repo) = repository();
        let created = repo.create(task("a", TaskStatus::Pending)).await.unwrap();

        assert!(repo.delete_by_id(created.id).await.unwrap());
        assert_eq!(repo.get_by_id(created.id, &Columns::All).await.unwrap(), None);
        assert_eq!(store.row_count("tasks").await, 1);

        let trashed = repo
            .query()
            .with_trashed()
            .where_eq("id", created.id)
            .first()
            .await
            .unwrap()
            .unwrap();
        assert!(trashed.deleted_at.is_some());

        // Already deleted rows count as absent.
        let err = repo.delete_by_id(created.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.delete_by_id(Id::new(77)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_force_delete_removes_trashed_rows() {
        let (store, repo) = repository();
        let created = repo.create(task("a", TaskStatus::Pending)).await.unwrap();
        repo.delete_by_id(created.id).await.unwrap();

        assert!(repo.force_delete_by_id(created.id).await.unwrap());
        assert_eq!(store.row_count("tasks").await, 0);
        assert!(!repo.force_delete_by_id(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_ids() {
        let (_, repo) = repository();
        for title in ["a", "b", "c"] {
            repo.create(task(title, TaskStatus::Pending)).await.unwrap();
        }

        let deleted = repo.delete_by_ids(&[Id::new(1), Id::new(3)]).await.unwrap();
        assert_eq!(deleted, 2);

        let left = repo.get_all(&Columns::All).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "b");
    }

    #[tokio::test]
    async fn test_hard_delete_for_entities_without_soft_deletes() {
        let store = Arc::new(MemoryStore::new());
        let tags: Repository<Tag> = Repository::new(store.clone());

        let tag = tags.create(Attributes::new().with("name", "urgent")).await.unwrap();
        let row = store.select("tags", &Default::default()).await.unwrap();
        assert!(!row[0].contains_key("created_at"));

        assert!(tags.delete_by_id(tag.id).await.unwrap());
        assert_eq!(store.row_count("tags").await, 0);
    }

    #[tokio::test]
    async fn test_first_by_key_value() {
        let (_, repo) = repository();
        repo.create(task("a", TaskStatus::Pending)).await.unwrap();
        repo.create(task("b", TaskStatus::Failed)).await.unwrap();

        let found = repo.first_by_key_value("title", "b").await.unwrap().unwrap();
        assert_eq!(found.status, TaskStatus::Failed);
        assert!(repo.first_by_key_value("title", "zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_by_orders_descending() {
        let (_, repo) = repository();
        repo.create(task("a", TaskStatus::Pending).with("priority", 2)).await.unwrap();
        repo.create(task("b", TaskStatus::Pending).with("priority", 9)).await.unwrap();
        repo.create(task("c", TaskStatus::Pending).with("priority", 5)).await.unwrap();

        let top = repo.latest_by("priority").await.unwrap().unwrap();
        assert_eq!(top.title, "b");

        // Equal or increasing timestamps: the newest insert wins.
        let newest = repo.latest().await.unwrap().unwrap();
        assert_eq!(newest.title, "c");
    }

    #[tokio::test]
    async fn test_update_or_create_updates_existing_row() {
        let (store, repo) = repository();
        repo.create(task("a", TaskStatus::Pending)).await.unwrap();
        repo.create(task("b", TaskStatus::Failed)).await.unwrap();

        let result = repo
            .update_or_create(
                Attributes::new().with("status", TaskStatus::Pending),
                Attributes::new().with("status", TaskStatus::Completed),
            )
            .await
            .unwrap();

        assert_eq!(result.id, Id::new(1));
        assert_eq!(result.status, TaskStatus::Completed);
        assert_eq!(store.row_count("tasks").await, 2);

        let completed = repo
            .query()
            .where_eq("status", TaskStatus::Completed)
            .count()
            .await
            .unwrap();
        assert_eq!(completed, 1);
    }

    #[tokio::test]
    async fn test_update_or_create_creates_when_no_match() {
        let (store, repo) = repository();
        repo.create(task("b", TaskStatus::Failed)).await.unwrap();

        let result = repo
            .update_or_create(
                Attributes::new().with("status", TaskStatus::Pending),
                Attributes::new().with("status", TaskStatus::Completed),
            )
            .await
            .unwrap();

        assert_eq!(result.id, Id::new(2));
        assert_eq!(result.status, TaskStatus::Completed);
        assert_eq!(store.row_count("tasks").await, 2);
    }

    #[tokio::test]
    async fn test_query_escape_hatch_composes() {
        let (_, repo) = repository();
        for (title, status) in [
            ("a", TaskStatus::Pending),
            ("b", TaskStatus::Failed),
            ("c", TaskStatus::Pending),
        ] {
            repo.create(task(title, status)).await.unwrap();
        }

        let pending = repo
            .query()
            .where_eq("status", json!(0))
            .order_by("title", Direction::Desc)
            .get()
            .await
            .unwrap();
        let titles: Vec<&str> = pending.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a"]);
        assert!(repo.query().where_null("description").exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_paginate_uses_configured_page_size() {
        let store = Arc::new(MemoryStore::new());
        let repo = TaskRepository::with_config(store, RepositoryConfig { items_per_page: 2 });
        for title in ["a", "b", "c", "d", "e"] {
            repo.create(task(title, TaskStatus::Pending)).await.unwrap();
        }

        let page = repo.paginate(2).await.unwrap();
        assert_eq!(page.total, Some(5));
        assert_eq!(page.last_page(), Some(3));
        let titles: Vec<&str> = page.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "d"]);

        let simple = repo.simple_paginate(3).await.unwrap();
        assert!(simple.is_minimal());
        assert_eq!(simple.items.len(), 1);
        assert!(!simple.has_more_pages());
        assert!(repo.simple_paginate(1).await.unwrap().has_more_pages());
    }

    #[test]
    fn test_default_items_per_page() {
        let repo = TaskRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.items_per_page(), 15);
    }
}
