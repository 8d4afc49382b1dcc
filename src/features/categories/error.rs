use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Caller-correctable failures of category operations
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{0}")]
    NotFound(String),

    #[error("Slug '{0}' already exists")]
    SlugConflict(String),

    #[error("Name '{0}' has no characters usable in a slug; provide a slug")]
    UnsluggableName(String),

    #[error("Category cannot be its own parent")]
    SelfParent,

    #[error("Cannot set a descendant as parent (circular reference)")]
    CircularReference,

    #[error(
        "Category {id} still has {children} child categories and {articles} articles; move or delete them first"
    )]
    HasDependents {
        id: Uuid,
        children: i64,
        articles: i64,
    },
}

impl CategoryError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound(format!("Category with id {} not found", id))
    }

    pub fn not_in_trash(id: Uuid) -> Self {
        Self::NotFound(format!("Category in trash with id {} not found", id))
    }

    pub fn parent_not_found(id: Uuid) -> Self {
        Self::NotFound(format!("Parent category with id {} not found", id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CategoryError::NotFound(_) => StatusCode::NOT_FOUND,
            CategoryError::SlugConflict(_) | CategoryError::HasDependents { .. } => {
                StatusCode::CONFLICT
            }
            CategoryError::UnsluggableName(_)
            | CategoryError::SelfParent
            | CategoryError::CircularReference => StatusCode::BAD_REQUEST,
        }
    }
}
