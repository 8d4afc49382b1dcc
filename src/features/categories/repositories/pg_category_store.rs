use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::error::CategoryError;
use crate::features::categories::models::{
    Category, CategoryFilter, CategoryState, DeletedScope, NewCategory, ParentLink,
};

use super::category_store::{CategoryStore, CategoryUnitOfWork};

const CATEGORY_COLUMNS: &str = "id, parent_id, name, slug, description, icon, image_url, \
     sort_order, is_active, deleted, deleted_at, created_at, updated_at";

const SLUG_UNIQUE_CONSTRAINT: &str = "categories_slug_key";
const PARENT_FK_CONSTRAINT: &str = "categories_parent_id_fkey";

enum ConstraintViolation {
    SlugTaken,
    ParentMissing,
}

fn constraint_violation(e: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_err) = e else {
        return None;
    };
    match (db_err.code().as_deref(), db_err.constraint()) {
        (Some("23505"), Some(SLUG_UNIQUE_CONSTRAINT)) => Some(ConstraintViolation::SlugTaken),
        (Some("23503"), Some(PARENT_FK_CONSTRAINT)) => Some(ConstraintViolation::ParentMissing),
        _ => None,
    }
}

/// Map INSERT/UPDATE failures, turning constraint races into domain errors
fn map_write_error(
    e: sqlx::Error,
    category: &str,
    slug: &str,
    parent_id: Option<Uuid>,
) -> AppError {
    match (constraint_violation(&e), parent_id) {
        // Unique violation that slipped past the slug lookup
        (Some(ConstraintViolation::SlugTaken), _) => {
            tracing::warn!(
                "Slug '{}' taken concurrently while saving {}",
                slug,
                category
            );
            CategoryError::SlugConflict(slug.to_string()).into()
        }
        // Parent erased between lookup and write
        (Some(ConstraintViolation::ParentMissing), Some(parent_id)) => {
            CategoryError::parent_not_found(parent_id).into()
        }
        _ => {
            tracing::error!("Failed to save category {}: {:?}", category, e);
            AppError::Database(e)
        }
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", context, e);
        AppError::Database(e)
    }
}

/// Escape LIKE metacharacters so `base` is matched literally
fn like_prefix(base: &str) -> String {
    let escaped = base
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{}-%", escaped)
}

fn list_query(filter: CategoryFilter) -> String {
    let mut conditions = Vec::new();

    match filter.scope {
        DeletedScope::Live => conditions.push("deleted = FALSE"),
        DeletedScope::Trashed => conditions.push("deleted = TRUE"),
        DeletedScope::Any => {}
    }
    if filter.active_only {
        conditions.push("is_active = TRUE");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let order_by = match filter.scope {
        DeletedScope::Trashed => "deleted_at DESC, seq",
        _ => "sort_order, seq",
    };

    format!(
        "SELECT {} FROM categories {} ORDER BY {}",
        CATEGORY_COLUMNS, where_clause, order_by
    )
}

/// PostgreSQL-backed category store
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&list_query(filter))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list categories"))
    }

    async fn parent_links(&self) -> Result<Vec<ParentLink>> {
        sqlx::query_as::<_, ParentLink>("SELECT id, parent_id, name FROM categories")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("load category parent links"))
    }

    async fn article_counts(&self) -> Result<HashMap<Uuid, i64>> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT category_id, COUNT(*)
            FROM articles
            WHERE deleted = FALSE AND category_id IS NOT NULL
            GROUP BY category_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("count articles per category"))?;

        Ok(rows.into_iter().collect())
    }

    async fn begin(&self) -> Result<Box<dyn CategoryUnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin category transaction"))?;
        Ok(Box::new(PgCategoryUnitOfWork { tx }))
    }
}

pub struct PgCategoryUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CategoryUnitOfWork for PgCategoryUnitOfWork {
    async fn find_category_by_id(&mut self, id: Uuid) -> Result<Option<Category>> {
        let query = format!(
            "SELECT {} FROM categories WHERE id = $1 FOR UPDATE",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("find category"))
    }

    async fn exists_by_slug(&mut self, slug: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_error("check category slug"))
    }

    async fn slugs_with_prefix(&mut self, base: &str) -> Result<HashSet<String>> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM categories WHERE slug = $1 OR slug LIKE $2",
        )
        .bind(base)
        .bind(like_prefix(base))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error("load category slugs"))?;

        Ok(slugs.into_iter().collect())
    }

    async fn insert(&mut self, category: NewCategory) -> Result<Category> {
        let query = format!(
            r#"
            INSERT INTO categories
                (parent_id, name, slug, description, icon, image_url, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(category.parent_id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(&category.icon)
            .bind(&category.image_url)
            .bind(category.sort_order)
            .bind(category.is_active)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_write_error(e, &category.name, &category.slug, category.parent_id))
    }

    async fn save(&mut self, category: &Category) -> Result<Category> {
        if category.state == CategoryState::Erased {
            return Err(AppError::Internal(format!(
                "Category {} is erased and cannot be saved",
                category.id
            )));
        }

        let query = format!(
            r#"
            UPDATE categories
            SET parent_id = $2,
                name = $3,
                slug = $4,
                description = $5,
                icon = $6,
                image_url = $7,
                sort_order = $8,
                is_active = $9,
                deleted = $10,
                deleted_at = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(category.id)
            .bind(category.parent_id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(&category.icon)
            .bind(&category.image_url)
            .bind(category.sort_order)
            .bind(category.is_active)
            .bind(category.state.is_deleted())
            .bind(category.state.deleted_at())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                map_write_error(
                    e,
                    &category.id.to_string(),
                    &category.slug,
                    category.parent_id,
                )
            })?
            .ok_or_else(|| CategoryError::not_found(category.id).into())
    }

    async fn parent_links(&mut self) -> Result<Vec<ParentLink>> {
        sqlx::query_as::<_, ParentLink>("SELECT id, parent_id, name FROM categories")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("load category parent links"))
    }

    async fn count_non_deleted_children(&mut self, id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE parent_id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("count child categories"))
    }

    async fn count_non_deleted_articles(&mut self, id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM articles WHERE category_id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("count category articles"))
    }

    async fn detach_articles_from_category(&mut self, id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE articles SET category_id = NULL, updated_at = NOW() WHERE category_id = $1",
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("detach articles from category"))?;

        Ok(result.rows_affected())
    }

    async fn detach_products_from_category(&mut self, id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE products SET category_id = NULL, updated_at = NOW() WHERE category_id = $1",
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("detach products from category"))?;

        Ok(result.rows_affected())
    }

    async fn detach_children_from_category(&mut self, id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE categories SET parent_id = NULL, updated_at = NOW() WHERE parent_id = $1",
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("detach child categories"))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id_bypassing_cascade(&mut self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(db_error("delete category"))?;

        if result.rows_affected() == 0 {
            return Err(CategoryError::not_found(id).into());
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx
            .commit()
            .await
            .map_err(db_error("commit category transaction"))
    }
}
