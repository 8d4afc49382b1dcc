use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::categories::handlers::{
    admin_category_handler as admin, category_handler as public, CategoryServices,
};

/// Create public routes for the categories feature (no authentication required)
pub fn routes(services: CategoryServices) -> Router {
    Router::new()
        .route("/api/categories", get(public::list_categories))
        .route("/api/categories/tree", get(public::get_category_tree))
        .route("/api/categories/{slug}", get(public::get_category))
        .with_state(services)
}

/// Create admin routes for category management
///
/// Authorization is enforced in front of this service
pub fn admin_routes(services: CategoryServices) -> Router {
    Router::new()
        .route(
            "/api/admin/categories",
            get(admin::list_categories).post(admin::create_category),
        )
        .route("/api/admin/categories/tree", get(admin::get_category_tree))
        .route("/api/admin/categories/trash", get(admin::list_trash))
        .route(
            "/api/admin/categories/{id}",
            get(admin::get_category)
                .put(admin::update_category)
                .delete(admin::delete_category),
        )
        .route(
            "/api/admin/categories/{id}/restore",
            post(admin::restore_category),
        )
        .route(
            "/api/admin/categories/{id}/permanent",
            delete(admin::permanent_delete_category),
        )
        .with_state(services)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::features::categories::repositories::MemoryCategoryStore;
    use crate::shared::test_helpers::category_test_server;

    async fn create(server: &axum_test::TestServer, body: Value) -> Value {
        let response = server.post("/api/admin/categories").json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    fn id_of(record: &Value) -> Uuid {
        record["id"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_201_with_derived_slug() {
        let server = category_test_server(MemoryCategoryStore::new());

        let response = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Vòng Tay", "slug": "", "parentId": "" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["slug"], "vong-tay");
        assert_eq!(body["data"]["sortOrder"], 0);
        assert_eq!(body["data"]["active"], true);
        assert_eq!(body["data"]["level"], 0);
        assert_eq!(body["data"]["parentId"], Value::Null);
        assert_eq!(body["data"]["children"], json!([]));
    }

    #[tokio::test]
    async fn test_create_validation_errors_are_400() {
        let server = category_test_server(MemoryCategoryStore::new());

        let blank = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "  " }))
            .await;
        blank.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(blank.json::<Value>()["success"], false);

        let bad_slug = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Tech", "slug": "Not A Slug" }))
            .await;
        bad_slug.assert_status(StatusCode::BAD_REQUEST);

        let unsluggable = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "!!!" }))
            .await;
        unsluggable.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            unsluggable.json::<Value>()["message"],
            "Name '!!!' has no characters usable in a slug; provide a slug"
        );

        let bad_parent = server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Tech", "parentId": "nope" }))
            .await;
        bad_parent.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let server = category_test_server(MemoryCategoryStore::new());
        let root = create(&server, json!({ "name": "Root" })).await;
        let child = create(
            &server,
            json!({ "name": "Child", "parentId": root["id"].clone() }),
        )
        .await;
        let root_id = id_of(&root);

        server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Other", "slug": "root" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Lost", "parentId": Uuid::new_v4() }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .put(&format!("/api/admin/categories/{}", root_id))
            .json(&json!({ "parentId": root_id }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let circular = server
            .put(&format!("/api/admin/categories/{}", root_id))
            .json(&json!({ "parentId": child["id"].clone() }))
            .await;
        circular.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            circular.json::<Value>()["message"],
            "Cannot set a descendant as parent (circular reference)"
        );

        server
            .delete(&format!("/api/admin/categories/{}", root_id))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .get(&format!("/api/admin/categories/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .delete(&format!("/api/admin/categories/{}/permanent", root_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_is_partial_and_clears_parent() {
        let server = category_test_server(MemoryCategoryStore::new());
        let root = create(&server, json!({ "name": "Root" })).await;
        let child = create(
            &server,
            json!({ "name": "Child", "description": "keep", "parentId": root["id"].clone() }),
        )
        .await;
        let child_id = id_of(&child);

        let renamed = server
            .put(&format!("/api/admin/categories/{}", child_id))
            .json(&json!({ "name": "Renamed" }))
            .await;
        renamed.assert_status_ok();
        let data = renamed.json::<Value>()["data"].clone();
        assert_eq!(data["name"], "Renamed");
        assert_eq!(data["description"], "keep");
        assert_eq!(data["parentId"], root["id"]);
        assert_eq!(data["parentName"], "Root");

        let promoted = server
            .put(&format!("/api/admin/categories/{}", child_id))
            .json(&json!({ "parentId": null }))
            .await;
        promoted.assert_status_ok();
        let data = promoted.json::<Value>()["data"].clone();
        assert_eq!(data["parentId"], Value::Null);
        assert_eq!(data["level"], 0);
    }

    #[tokio::test]
    async fn test_public_views_hide_inactive_and_trashed() {
        let server = category_test_server(MemoryCategoryStore::new());
        let root = create(&server, json!({ "name": "Vòng Tay" })).await;
        create(
            &server,
            json!({ "name": "Trầm Tốc", "parentId": root["id"].clone() }),
        )
        .await;
        create(&server, json!({ "name": "Hidden", "active": false })).await;
        let gone = create(&server, json!({ "name": "Gone" })).await;
        server
            .delete(&format!("/api/admin/categories/{}", id_of(&gone)))
            .await
            .assert_status_ok();

        let flat: Value = server.get("/api/categories").await.json();
        assert_eq!(flat["meta"]["total"], 2);

        let tree: Value = server.get("/api/categories/tree").await.json();
        let roots = tree["data"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["children"][0]["slug"], "tram-toc");

        let by_slug = server.get("/api/categories/vong-tay").await;
        by_slug.assert_status_ok();
        assert_eq!(by_slug.json::<Value>()["data"]["children"][0]["level"], 1);

        server
            .get("/api/categories/gone")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_listing_filters() {
        let server = category_test_server(MemoryCategoryStore::new());
        create(&server, json!({ "name": "Live" })).await;
        create(&server, json!({ "name": "Inactive", "active": false })).await;
        let gone = create(&server, json!({ "name": "Gone" })).await;
        server
            .delete(&format!("/api/admin/categories/{}", id_of(&gone)))
            .await
            .assert_status_ok();

        let live: Value = server.get("/api/admin/categories").await.json();
        assert_eq!(live["meta"]["total"], 2);

        let all: Value = server
            .get("/api/admin/categories")
            .add_query_param("includeDeleted", true)
            .await
            .json();
        assert_eq!(all["meta"]["total"], 3);

        let active: Value = server
            .get("/api/admin/categories/tree")
            .add_query_param("activeOnly", true)
            .await
            .json();
        assert_eq!(active["data"].as_array().unwrap().len(), 1);

        let trash: Value = server.get("/api/admin/categories/trash").await.json();
        assert_eq!(trash["meta"]["total"], 1);
        assert_eq!(trash["data"][0]["deleted"], true);
        assert!(trash["data"][0]["deletedAt"].is_string());
    }

    #[tokio::test]
    async fn test_trash_lifecycle_over_http() {
        let store = MemoryCategoryStore::new();
        let server = category_test_server(store.clone());
        let root = create(&server, json!({ "name": "Vòng Tay" })).await;
        let child = create(
            &server,
            json!({ "name": "Trầm Tốc", "parentId": root["id"].clone() }),
        )
        .await;
        let (root_id, child_id) = (id_of(&root), id_of(&child));
        let article = store.add_article(Some(root_id), true);
        let product = store.add_product(Some(root_id));

        server
            .post(&format!("/api/admin/categories/{}/restore", child_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        for id in [child_id, root_id] {
            server
                .delete(&format!("/api/admin/categories/{}", id))
                .await
                .assert_status_ok();
        }

        let restored = server
            .post(&format!("/api/admin/categories/{}/restore", child_id))
            .await;
        restored.assert_status_ok();
        assert_eq!(restored.json::<Value>()["data"]["deleted"], false);

        let erased = server
            .delete(&format!("/api/admin/categories/{}/permanent", root_id))
            .await;
        erased.assert_status_ok();
        assert_eq!(erased.json::<Value>()["success"], true);

        let state = store.snapshot();
        assert!(store.category(root_id).is_none());
        assert_eq!(store.category(child_id).unwrap().parent_id, None);
        assert!(state
            .articles
            .iter()
            .any(|a| a.id == article && a.category_id.is_none()));
        assert!(state
            .products
            .iter()
            .any(|p| p.id == product && p.category_id.is_none()));

        server
            .get(&format!("/api/admin/categories/{}", root_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
