use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::error::CategoryError;
use crate::features::categories::hierarchy::ParentIndex;
use crate::features::categories::models::{Category, NewCategory};
use crate::features::categories::repositories::{CategoryStore, CategoryUnitOfWork};
use crate::shared::slug::{generate_unique_slug, slugify};

/// References severed by a permanent delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetachedReferences {
    pub articles: u64,
    pub products: u64,
    pub children: u64,
}

/// Write side of the category hierarchy. Each operation runs in one unit of work
/// and commits only when every step succeeded.
#[derive(Clone)]
pub struct CategoryLifecycleService {
    store: Arc<dyn CategoryStore>,
}

/// Record as seen from inside the transaction, before commit
async fn describe(uow: &mut dyn CategoryUnitOfWork, category: Category) -> Result<CategoryResponseDto> {
    let index = ParentIndex::new(uow.parent_links().await?);
    let article_count = uow.count_non_deleted_articles(category.id).await?;
    Ok(CategoryResponseDto::from_category(category, &index, article_count))
}

async fn load(uow: &mut dyn CategoryUnitOfWork, id: Uuid) -> Result<Category> {
    uow.find_category_by_id(id)
        .await?
        .ok_or_else(|| CategoryError::not_found(id).into())
}

impl CategoryLifecycleService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        tracing::info!("Creating category '{}'", dto.name);
        let mut uow = self.store.begin().await?;

        let slug = match dto.slug {
            Some(slug) => {
                if uow.exists_by_slug(&slug).await? {
                    return Err(CategoryError::SlugConflict(slug).into());
                }
                slug
            }
            None => {
                let base = slugify(&dto.name);
                if base.is_empty() {
                    return Err(CategoryError::UnsluggableName(dto.name).into());
                }
                let taken = uow.slugs_with_prefix(&base).await?;
                generate_unique_slug(&dto.name, |candidate| taken.contains(candidate))
            }
        };

        if let Some(parent_id) = dto.parent_id {
            if uow.find_category_by_id(parent_id).await?.is_none() {
                return Err(CategoryError::parent_not_found(parent_id).into());
            }
        }

        let category = uow
            .insert(NewCategory {
                parent_id: dto.parent_id,
                name: dto.name,
                slug,
                description: dto.description,
                icon: dto.icon,
                image_url: dto.image_url,
                sort_order: dto.sort_order.unwrap_or(0),
                is_active: dto.active.unwrap_or(true),
            })
            .await?;

        let record = describe(uow.as_mut(), category).await?;
        uow.commit().await?;

        tracing::info!("Category created: {} ({})", record.id, record.slug);
        Ok(record)
    }

    /// Applies only the fields present in `dto`
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        tracing::info!("Updating category {}", id);
        let mut uow = self.store.begin().await?;
        let mut category = load(uow.as_mut(), id).await?;

        if let Some(slug) = dto.slug {
            if slug != category.slug {
                if uow.exists_by_slug(&slug).await? {
                    return Err(CategoryError::SlugConflict(slug).into());
                }
                category.slug = slug;
            }
        }

        match dto.parent_id {
            None => {}
            Some(None) => category.parent_id = None,
            Some(Some(parent_id)) => {
                if parent_id == id {
                    return Err(CategoryError::SelfParent.into());
                }
                if uow.find_category_by_id(parent_id).await?.is_none() {
                    return Err(CategoryError::parent_not_found(parent_id).into());
                }
                let index = ParentIndex::new(uow.parent_links().await?);
                index.check_reparent(id, parent_id)?;
                category.parent_id = Some(parent_id);
            }
        }

        if let Some(name) = dto.name {
            category.name = name;
        }
        if let Some(description) = dto.description {
            category.description = Some(description);
        }
        if let Some(icon) = dto.icon {
            category.icon = Some(icon);
        }
        if let Some(image_url) = dto.image_url {
            category.image_url = Some(image_url);
        }
        if let Some(sort_order) = dto.sort_order {
            category.sort_order = sort_order;
        }
        if let Some(active) = dto.active {
            category.is_active = active;
        }

        let saved = uow.save(&category).await?;
        let record = describe(uow.as_mut(), saved).await?;
        uow.commit().await?;

        tracing::info!("Category updated: {}", id);
        Ok(record)
    }

    /// Moves a category to the trash. Blocked while live children or articles remain.
    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        tracing::info!("Soft deleting category {}", id);
        let mut uow = self.store.begin().await?;
        let mut category = load(uow.as_mut(), id).await?;

        category.state = category
            .state
            .trash(Utc::now())
            .ok_or_else(|| CategoryError::not_found(id))?;

        let children = uow.count_non_deleted_children(id).await?;
        let articles = uow.count_non_deleted_articles(id).await?;
        if children > 0 || articles > 0 {
            return Err(CategoryError::HasDependents {
                id,
                children,
                articles,
            }
            .into());
        }

        uow.save(&category).await?;
        uow.commit().await?;

        tracing::info!("Category soft deleted: {}", id);
        Ok(())
    }

    pub async fn restore(&self, id: Uuid) -> Result<CategoryResponseDto> {
        tracing::info!("Restoring category {}", id);
        let mut uow = self.store.begin().await?;
        let mut category = uow
            .find_category_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::not_in_trash(id))?;

        category.state = category
            .state
            .restore()
            .ok_or_else(|| CategoryError::not_in_trash(id))?;

        let saved = uow.save(&category).await?;
        let record = describe(uow.as_mut(), saved).await?;
        uow.commit().await?;

        tracing::info!("Category restored: {}", id);
        Ok(record)
    }

    /// Erases a trashed category after detaching its articles, products and children.
    /// Nothing is deleted besides the category row itself.
    pub async fn permanent_delete(&self, id: Uuid) -> Result<DetachedReferences> {
        tracing::info!("Permanently deleting category {}", id);
        let mut uow = self.store.begin().await?;
        let category = uow
            .find_category_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::not_in_trash(id))?;

        category
            .state
            .erase()
            .ok_or_else(|| CategoryError::not_in_trash(id))?;

        let detached = DetachedReferences {
            articles: uow.detach_articles_from_category(id).await?,
            products: uow.detach_products_from_category(id).await?,
            children: uow.detach_children_from_category(id).await?,
        };
        uow.delete_by_id_bypassing_cascade(id).await?;
        uow.commit().await?;

        tracing::info!(
            "Category permanently deleted: {} (detached {} articles, {} products, {} children)",
            id,
            detached.articles,
            detached.products,
            detached.children
        );
        Ok(detached)
    }
}
