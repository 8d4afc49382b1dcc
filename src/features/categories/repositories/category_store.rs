use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryFilter, NewCategory, ParentLink};

/// Read access to categories and the entry point for transactional writes
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>>;

    /// Parent links of every category, trashed ones included
    async fn parent_links(&self) -> Result<Vec<ParentLink>>;

    /// Non-deleted article count per category id; categories without articles are absent
    async fn article_counts(&self) -> Result<HashMap<Uuid, i64>>;

    async fn begin(&self) -> Result<Box<dyn CategoryUnitOfWork>>;
}

/// One transaction. Dropping it without [`CategoryUnitOfWork::commit`] discards every write.
#[async_trait]
pub trait CategoryUnitOfWork: Send {
    async fn find_category_by_id(&mut self, id: Uuid) -> Result<Option<Category>>;

    /// Checks every row, trashed ones included
    async fn exists_by_slug(&mut self, slug: &str) -> Result<bool>;

    /// `base` itself and every slug of the form `base-*`
    async fn slugs_with_prefix(&mut self, base: &str) -> Result<HashSet<String>>;

    async fn insert(&mut self, category: NewCategory) -> Result<Category>;

    async fn save(&mut self, category: &Category) -> Result<Category>;

    async fn parent_links(&mut self) -> Result<Vec<ParentLink>>;

    async fn count_non_deleted_children(&mut self, id: Uuid) -> Result<i64>;

    async fn count_non_deleted_articles(&mut self, id: Uuid) -> Result<i64>;

    async fn detach_articles_from_category(&mut self, id: Uuid) -> Result<u64>;

    async fn detach_products_from_category(&mut self, id: Uuid) -> Result<u64>;

    async fn detach_children_from_category(&mut self, id: Uuid) -> Result<u64>;

    /// Plain `DELETE` of the single row; nothing cascades
    async fn delete_by_id_bypassing_cascade(&mut self, id: Uuid) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
