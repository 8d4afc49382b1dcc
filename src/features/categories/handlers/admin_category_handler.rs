use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryListQuery, CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::handlers::CategoryServices;
use crate::shared::types::{ApiResponse, Meta};

/// List categories (flat), optionally including trashed or only active ones
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    params(CategoryListQuery),
    responses(
        (status = 200, description = "Categories ordered by sortOrder", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "admin-categories"
)]
pub async fn list_categories(
    State(services): State<CategoryServices>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = services.tree.list_flat(query.into()).await?;
    let meta = Meta::total(categories.len());
    Ok(Json(ApiResponse::success(Some(categories), None, Some(meta))))
}

/// List categories as a tree
#[utoipa::path(
    get,
    path = "/api/admin/categories/tree",
    params(CategoryListQuery),
    responses(
        (status = 200, description = "Root categories with nested children", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "admin-categories"
)]
pub async fn get_category_tree(
    State(services): State<CategoryServices>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let roots = services.tree.list_tree(query.into()).await?;
    Ok(Json(ApiResponse::success(Some(roots), None, None)))
}

/// List soft-deleted categories, most recently deleted first
#[utoipa::path(
    get,
    path = "/api/admin/categories/trash",
    responses(
        (status = 200, description = "Trashed categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "admin-categories"
)]
pub async fn list_trash(
    State(services): State<CategoryServices>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = services.tree.list_trash().await?;
    let meta = Meta::total(categories.len());
    Ok(Json(ApiResponse::success(Some(categories), None, Some(meta))))
}

/// Get a non-deleted category with its subtree
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories"
)]
pub async fn get_category(
    State(services): State<CategoryServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = services.tree.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Parent category not found"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "admin-categories"
)]
pub async fn create_category(
    State(services): State<CategoryServices>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = services.lifecycle.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category),
            Some("Category created".to_string()),
            None,
        )),
    ))
}

/// Update the fields present in the body
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error, self parent or circular reference"),
        (status = 404, description = "Category or parent not found"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "admin-categories"
)]
pub async fn update_category(
    State(services): State<CategoryServices>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = services.lifecycle.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(category),
        Some("Category updated".to_string()),
        None,
    )))
}

/// Move a category to the trash
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category moved to trash"),
        (status = 404, description = "Category not found or already in trash"),
        (status = 409, description = "Category still has child categories or articles")
    ),
    tag = "admin-categories"
)]
pub async fn delete_category(
    State(services): State<CategoryServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    services.lifecycle.soft_delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category moved to trash".to_string()),
        None,
    )))
}

/// Restore a category from the trash
#[utoipa::path(
    post,
    path = "/api/admin/categories/{id}/restore",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category restored", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not in trash")
    ),
    tag = "admin-categories"
)]
pub async fn restore_category(
    State(services): State<CategoryServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = services.lifecycle.restore(id).await?;
    Ok(Json(ApiResponse::success(
        Some(category),
        Some("Category restored".to_string()),
        None,
    )))
}

/// Erase a trashed category; its articles, products and children are detached, not deleted
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}/permanent",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category permanently deleted"),
        (status = 404, description = "Category not in trash")
    ),
    tag = "admin-categories"
)]
pub async fn permanent_delete_category(
    State(services): State<CategoryServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    services.lifecycle.permanent_delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category permanently deleted".to_string()),
        None,
    )))
}
