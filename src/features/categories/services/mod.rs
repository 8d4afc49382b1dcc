pub mod category_lifecycle_service;
pub mod category_tree_service;

pub use category_lifecycle_service::CategoryLifecycleService;
pub use category_tree_service::CategoryTreeService;
