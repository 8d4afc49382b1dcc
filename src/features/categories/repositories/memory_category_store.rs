use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::error::CategoryError;
use crate::features::categories::models::{
    Category, CategoryFilter, CategoryState, DeletedScope, NewCategory, ParentLink,
};

use super::category_store::{CategoryStore, CategoryUnitOfWork};

#[derive(Debug, Clone)]
pub struct ArticleRow {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub deleted: bool,
}

#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
}

/// Rows in insertion order
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub categories: Vec<Category>,
    pub articles: Vec<ArticleRow>,
    pub products: Vec<ProductRow>,
}

impl CatalogState {
    fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.categories
            .iter()
            .any(|c| c.slug == slug && Some(c.id) != except)
    }

    fn parent_links(&self) -> Vec<ParentLink> {
        self.categories.iter().map(ParentLink::from).collect()
    }

    fn is_referenced(&self, id: Uuid) -> bool {
        self.categories.iter().any(|c| c.parent_id == Some(id))
            || self.articles.iter().any(|a| a.category_id == Some(id))
            || self.products.iter().any(|p| p.category_id == Some(id))
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_deletes: AtomicBool,
    blind_slug_lookups: AtomicBool,
}

/// In-memory store with the same constraints as the PostgreSQL schema:
/// unique slugs, parent foreign key without cascade and all-or-nothing commits.
#[derive(Debug, Clone, Default)]
pub struct MemoryCategoryStore {
    state: Arc<Mutex<CatalogState>>,
    faults: Arc<Faults>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().expect("catalog state poisoned")
    }

    pub fn snapshot(&self) -> CatalogState {
        self.lock().clone()
    }

    pub fn category(&self, id: Uuid) -> Option<Category> {
        self.lock().category(id).cloned()
    }

    pub fn add_article(&self, category_id: Option<Uuid>, deleted: bool) -> Uuid {
        let id = Uuid::now_v7();
        self.lock().articles.push(ArticleRow {
            id,
            category_id,
            deleted,
        });
        id
    }

    pub fn add_product(&self, category_id: Option<Uuid>) -> Uuid {
        let id = Uuid::now_v7();
        self.lock().products.push(ProductRow { id, category_id });
        id
    }

    pub fn set_article_category(&self, article_id: Uuid, category_id: Option<Uuid>) {
        if let Some(article) = self.lock().articles.iter_mut().find(|a| a.id == article_id) {
            article.category_id = category_id;
        }
    }

    /// Make `delete_by_id_bypassing_cascade` fail, to exercise rollback
    pub fn fail_deletes(&self) {
        self.faults.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Make slug lookups report nothing, as if another writer raced past them
    pub fn blind_slug_lookups(&self) {
        self.faults.blind_slug_lookups.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .lock()
            .categories
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();

        match filter.scope {
            DeletedScope::Trashed => {
                categories.sort_by(|a, b| b.state.deleted_at().cmp(&a.state.deleted_at()))
            }
            _ => categories.sort_by_key(|c| c.sort_order),
        }

        Ok(categories)
    }

    async fn parent_links(&self) -> Result<Vec<ParentLink>> {
        Ok(self.lock().parent_links())
    }

    async fn article_counts(&self) -> Result<HashMap<Uuid, i64>> {
        let mut counts = HashMap::new();
        for article in self.lock().articles.iter().filter(|a| !a.deleted) {
            if let Some(category_id) = article.category_id {
                *counts.entry(category_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn begin(&self) -> Result<Box<dyn CategoryUnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            working: self.snapshot(),
            store: self.clone(),
        }))
    }
}

/// Works on a private copy that replaces the shared state on commit
struct MemoryUnitOfWork {
    store: MemoryCategoryStore,
    working: CatalogState,
}

impl MemoryUnitOfWork {
    fn slug_lookups_blind(&self) -> bool {
        self.store.faults.blind_slug_lookups.load(Ordering::SeqCst)
    }

    fn check_parent(&self, parent_id: Option<Uuid>) -> Result<()> {
        match parent_id {
            Some(parent_id) if self.working.category(parent_id).is_none() => {
                Err(CategoryError::parent_not_found(parent_id).into())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CategoryUnitOfWork for MemoryUnitOfWork {
    async fn find_category_by_id(&mut self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.working.category(id).cloned())
    }

    async fn exists_by_slug(&mut self, slug: &str) -> Result<bool> {
        if self.slug_lookups_blind() {
            return Ok(false);
        }
        Ok(self.working.slug_taken(slug, None))
    }

    async fn slugs_with_prefix(&mut self, base: &str) -> Result<HashSet<String>> {
        if self.slug_lookups_blind() {
            return Ok(HashSet::new());
        }
        let prefix = format!("{}-", base);
        Ok(self
            .working
            .categories
            .iter()
            .filter(|c| c.slug == base || c.slug.starts_with(&prefix))
            .map(|c| c.slug.clone())
            .collect())
    }

    async fn insert(&mut self, category: NewCategory) -> Result<Category> {
        if self.working.slug_taken(&category.slug, None) {
            return Err(CategoryError::SlugConflict(category.slug).into());
        }
        self.check_parent(category.parent_id)?;

        let now = Utc::now();
        let created = Category {
            id: Uuid::now_v7(),
            parent_id: category.parent_id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            icon: category.icon,
            image_url: category.image_url,
            sort_order: category.sort_order,
            is_active: category.is_active,
            state: CategoryState::Active,
            created_at: now,
            updated_at: now,
        };
        self.working.categories.push(created.clone());
        Ok(created)
    }

    async fn save(&mut self, category: &Category) -> Result<Category> {
        if category.state == CategoryState::Erased {
            return Err(AppError::Internal(format!(
                "Category {} is erased and cannot be saved",
                category.id
            )));
        }
        if self.working.slug_taken(&category.slug, Some(category.id)) {
            return Err(CategoryError::SlugConflict(category.slug.clone()).into());
        }
        self.check_parent(category.parent_id)?;

        let slot = self
            .working
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| CategoryError::not_found(category.id))?;

        *slot = Category {
            updated_at: Utc::now(),
            ..category.clone()
        };
        Ok(slot.clone())
    }

    async fn parent_links(&mut self) -> Result<Vec<ParentLink>> {
        Ok(self.working.parent_links())
    }

    async fn count_non_deleted_children(&mut self, id: Uuid) -> Result<i64> {
        let count = self
            .working
            .categories
            .iter()
            .filter(|c| c.parent_id == Some(id) && !c.state.is_deleted())
            .count();
        Ok(count as i64)
    }

    async fn count_non_deleted_articles(&mut self, id: Uuid) -> Result<i64> {
        let count = self
            .working
            .articles
            .iter()
            .filter(|a| a.category_id == Some(id) && !a.deleted)
            .count();
        Ok(count as i64)
    }

    async fn detach_articles_from_category(&mut self, id: Uuid) -> Result<u64> {
        let mut affected = 0;
        for article in self
            .working
            .articles
            .iter_mut()
            .filter(|a| a.category_id == Some(id))
        {
            article.category_id = None;
            affected += 1;
        }
        Ok(affected)
    }

    async fn detach_products_from_category(&mut self, id: Uuid) -> Result<u64> {
        let mut affected = 0;
        for product in self
            .working
            .products
            .iter_mut()
            .filter(|p| p.category_id == Some(id))
        {
            product.category_id = None;
            affected += 1;
        }
        Ok(affected)
    }

    async fn detach_children_from_category(&mut self, id: Uuid) -> Result<u64> {
        let mut affected = 0;
        for child in self
            .working
            .categories
            .iter_mut()
            .filter(|c| c.parent_id == Some(id))
        {
            child.parent_id = None;
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete_by_id_bypassing_cascade(&mut self, id: Uuid) -> Result<()> {
        if self.store.faults.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated delete failure".to_string()));
        }
        if self.working.is_referenced(id) {
            return Err(AppError::Internal(format!(
                "Category {} is still referenced",
                id
            )));
        }

        let before = self.working.categories.len();
        self.working.categories.retain(|c| c.id != id);
        if self.working.categories.len() == before {
            return Err(CategoryError::not_found(id).into());
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryUnitOfWork { store, working } = *self;
        *store.lock() = working;
        Ok(())
    }
}
