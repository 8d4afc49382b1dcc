use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::handlers::CategoryServices;
use crate::features::categories::models::CategoryFilter;
use crate::shared::types::{ApiResponse, Meta};

/// List active categories (flat)
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Active categories ordered by sortOrder", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(services): State<CategoryServices>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = services.tree.list_flat(CategoryFilter::public()).await?;
    let meta = Meta::total(categories.len());
    Ok(Json(ApiResponse::success(Some(categories), None, Some(meta))))
}

/// List active categories as a tree
#[utoipa::path(
    get,
    path = "/api/categories/tree",
    responses(
        (status = 200, description = "Active root categories with nested children", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn get_category_tree(
    State(services): State<CategoryServices>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let roots = services.tree.list_tree(CategoryFilter::public()).await?;
    Ok(Json(ApiResponse::success(Some(roots), None, None)))
}

/// Get category by slug
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(services): State<CategoryServices>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = services.tree.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}
