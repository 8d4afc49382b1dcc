use std::sync::Arc;

use crate::features::categories::repositories::CategoryStore;
use crate::features::categories::services::{CategoryLifecycleService, CategoryTreeService};

pub mod admin_category_handler;
pub mod category_handler;

/// State shared by the public and admin category handlers
#[derive(Clone)]
pub struct CategoryServices {
    pub tree: Arc<CategoryTreeService>,
    pub lifecycle: Arc<CategoryLifecycleService>,
}

impl CategoryServices {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self {
            tree: Arc::new(CategoryTreeService::new(store.clone())),
            lifecycle: Arc::new(CategoryLifecycleService::new(store)),
        }
    }
}
