use utoipa::{Modify, OpenApi};

use crate::features::categories::dtos as categories_dtos;
use crate::features::categories::handlers::{admin_category_handler, category_handler};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        category_handler::list_categories,
        category_handler::get_category_tree,
        category_handler::get_category,
        // Categories (admin)
        admin_category_handler::list_categories,
        admin_category_handler::get_category_tree,
        admin_category_handler::list_trash,
        admin_category_handler::get_category,
        admin_category_handler::create_category,
        admin_category_handler::update_category,
        admin_category_handler::delete_category,
        admin_category_handler::restore_category,
        admin_category_handler::permanent_delete_category,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Active category hierarchy (public)"),
        (name = "admin-categories", description = "Category management, trash and restore"),
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Category hierarchy for articles and products",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
