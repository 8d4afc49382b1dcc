//! Category hierarchy shared by articles and products.
//!
//! Categories form a forest through `parent_id`. Rows are soft-deleted into a trash
//! and can be restored; permanent deletion is only reachable from the trash and
//! detaches (never deletes) children, articles and products.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | Active categories (flat) |
//! | GET | `/api/categories/tree` | Active categories (tree) |
//! | GET | `/api/categories/{slug}` | Category with its subtree |
//! | GET | `/api/admin/categories` | Flat list with filters |
//! | GET | `/api/admin/categories/tree` | Tree with filters |
//! | GET | `/api/admin/categories/trash` | Soft-deleted categories |
//! | GET | `/api/admin/categories/{id}` | Category with its subtree |
//! | POST | `/api/admin/categories` | Create |
//! | PUT | `/api/admin/categories/{id}` | Partial update |
//! | DELETE | `/api/admin/categories/{id}` | Move to trash |
//! | POST | `/api/admin/categories/{id}/restore` | Restore from trash |
//! | DELETE | `/api/admin/categories/{id}/permanent` | Erase from trash |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use error::CategoryError;
pub use handlers::CategoryServices;
pub use repositories::{CategoryStore, PgCategoryStore};
