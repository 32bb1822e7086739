//! Integration tests for access control on the admin pages.

use reqwest::StatusCode;
use roya_admin::db::{BasketStore, ProductStore};
use roya_integration_tests::{TestApp, body, location};

const ADMIN_PAGES: &[&str] = &[
    "/admin",
    "/admin/list-products",
    "/admin/add-product",
    "/admin/edit-product?id=1",
    "/admin/delete-product?id=1",
    "/admin/list-baskets",
    "/admin/add-basket",
    "/admin/edit-basket?id=1",
    "/admin/delete-basket?id=1",
    "/admin/change-password",
];

#[tokio::test]
async fn test_admin_pages_require_login() {
    let app = TestApp::spawn().await;
    app.bootstrap().await;

    for path in ADMIN_PAGES {
        let response = app.get(path).await;
        assert_eq!(location(&response), Some("/login"), "GET {path}");
    }

    let response = app
        .post_form("/admin/add-product", &[("title", "Sneaky")])
        .await;
    assert_eq!(location(&response), Some("/login"));
    assert_eq!(app.store.count_products().await.ok(), Some(0));
}

#[tokio::test]
async fn test_non_admin_is_sent_home() {
    let app = TestApp::spawn().await;
    app.add_user("clerk", "clerk-pass", false).await;

    let response = app.login("clerk", "clerk-pass").await;
    assert_eq!(location(&response), Some("/"));

    for path in ADMIN_PAGES {
        let response = app.get(path).await;
        assert_eq!(location(&response), Some("/"), "GET {path}");
    }

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body(response).await.contains("Nothing here yet"));
}

#[tokio::test]
async fn test_non_admin_cannot_mutate() {
    let app = TestApp::spawn().await;
    app.add_user("clerk", "clerk-pass", false).await;
    app.login("clerk", "clerk-pass").await;

    let response = app
        .post_form("/admin/add-product", &[("title", "Sneaky")])
        .await;
    assert_eq!(location(&response), Some("/"));

    let response = app
        .post_form(
            "/admin/add-basket",
            &[
                ("item_title", "Cup"),
                ("item_color", "Red"),
                ("item_price", "1000"),
                ("item_count", "1"),
            ],
        )
        .await;
    assert_eq!(location(&response), Some("/"));

    assert_eq!(app.store.count_products().await.ok(), Some(0));
    assert_eq!(app.store.count_baskets().await.ok(), Some(0));
}
