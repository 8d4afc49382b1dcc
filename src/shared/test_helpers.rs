//! Routers wired to in-memory stores for HTTP tests.

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use crate::features::categories::repositories::MemoryCategoryStore;
use crate::features::categories::{routes as categories_routes, CategoryServices};

/// Public and admin category routes over `store`
pub fn category_router(store: MemoryCategoryStore) -> Router {
    let services = CategoryServices::new(Arc::new(store));
    Router::new()
        .merge(categories_routes::routes(services.clone()))
        .merge(categories_routes::admin_routes(services))
}

pub fn category_test_server(store: MemoryCategoryStore) -> TestServer {
    TestServer::new(category_router(store)).expect("failed to start test server")
}
