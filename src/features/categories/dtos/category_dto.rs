use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::hierarchy::ParentIndex;
use crate::features::categories::models::{Category, CategoryFilter};
use crate::shared::deserialize::{blank_as_none, optional_uuid, patch_uuid};
use crate::shared::validation::{validate_not_blank, SLUG_REGEX};

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    /// Derived from `name` when absent or blank
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        length(max = 255, message = "Slug must not exceed 255 characters"),
        regex(path = *SLUG_REGEX, message = "Slug may only contain a-z, 0-9, '_' and '-'")
    )]
    pub slug: Option<String>,

    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,

    /// Defaults to 0
    pub sort_order: Option<i32>,

    /// Defaults to true
    #[serde(alias = "isActive")]
    pub active: Option<bool>,

    /// Parent category id; `""` or `null` creates a root
    #[serde(default, deserialize_with = "optional_uuid")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub parent_id: Option<Uuid>,
}

/// Request DTO for a partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        length(max = 255, message = "Slug must not exceed 255 characters"),
        regex(path = *SLUG_REGEX, message = "Slug may only contain a-z, 0-9, '_' and '-'")
    )]
    pub slug: Option<String>,

    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,

    #[serde(alias = "isActive")]
    pub active: Option<bool>,

    /// Absent: keep the parent. `""` or `null`: promote to root. UUID: move under it.
    #[serde(default, deserialize_with = "patch_uuid")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub parent_id: Option<Option<Uuid>>,
}

/// Query params for admin listings
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct CategoryListQuery {
    /// Include soft-deleted categories
    #[serde(default)]
    pub include_deleted: bool,
    /// Only categories flagged active
    #[serde(default)]
    pub active_only: bool,
}

impl From<CategoryListQuery> for CategoryFilter {
    fn from(query: CategoryListQuery) -> Self {
        CategoryFilter::new(query.include_deleted, query.active_only)
    }
}

/// Response DTO for category, flat or with its nested children
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub active: bool,
    pub parent_id: Option<Uuid>,
    /// Name of the direct parent, even when it is trashed or inactive
    pub parent_name: Option<String>,
    /// Parent hops to a root
    pub level: i32,
    /// Non-deleted articles filed under this category
    pub article_count: i64,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub children: Vec<CategoryResponseDto>,
}

impl CategoryResponseDto {
    /// Record without children; `index` must cover the whole parent chain
    pub fn from_category(category: Category, index: &ParentIndex, article_count: i64) -> Self {
        let parent_name = category
            .parent_id
            .and_then(|parent_id| index.name_of(parent_id))
            .map(str::to_string);

        Self {
            level: index.level(category.id),
            parent_name,
            article_count,
            deleted: category.state.is_deleted(),
            deleted_at: category.state.deleted_at(),
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            icon: category.icon,
            image_url: category.image_url,
            sort_order: category.sort_order,
            active: category.is_active,
            parent_id: category.parent_id,
            created_at: category.created_at,
            updated_at: category.updated_at,
            children: Vec::new(),
        }
    }
}
