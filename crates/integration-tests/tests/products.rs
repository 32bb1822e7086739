//! Integration tests for the product catalog pages.

use reqwest::StatusCode;
use roya_admin::db::ProductStore;
use roya_integration_tests::{TestApp, body, location};

async fn product_titles(app: &TestApp) -> Vec<String> {
    app.store
        .list_products()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.title)
        .collect()
}

#[tokio::test]
async fn test_add_and_list_products() {
    let app = TestApp::spawn().await;
    app.login_admin().await;

    for title in ["Cup", "Bowl"] {
        let response = app.post_form("/admin/add-product", &[("title", title)]).await;
        assert_eq!(location(&response), Some("/admin/list-products"));
    }

    assert_eq!(product_titles(&app).await, ["Cup", "Bowl"]);

    let response = app.get("/admin/list-products").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body(response).await;
    let cup = html.find("Cup");
    let bowl = html.find("Bowl");
    assert!(cup.is_some() && bowl.is_some() && cup < bowl);
}

#[tokio::test]
async fn test_add_product_blank_title_is_ignored() {
    let app = TestApp::spawn().await;
    app.login_admin().await;

    let response = app.post_form("/admin/add-product", &[("title", "   ")]).await;
    assert_eq!(location(&response), Some("/admin/list-products"));
    let response = app.post_form("/admin/add-product", &[]).await;
    assert_eq!(location(&response), Some("/admin/list-products"));

    assert!(product_titles(&app).await.is_empty());
}

#[tokio::test]
async fn test_edit_product() {
    let app = TestApp::spawn().await;
    app.login_admin().await;
    app.post_form("/admin/add-product", &[("title", "Cup")]).await;
    let id = app
        .store
        .list_products()
        .await
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|p| p.id.to_string())
        .unwrap_or_default();

    let response = app.get(&format!("/admin/edit-product?id={id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body(response).await.contains("value=\"Cup\""));

    let response = app
        .post_form(&format!("/admin/edit-product?id={id}"), &[("title", "Mug")])
        .await;
    assert_eq!(location(&response), Some("/admin/list-products"));
    assert_eq!(product_titles(&app).await, ["Mug"]);

    // A blank title leaves the product alone.
    app.post_form(&format!("/admin/edit-product?id={id}"), &[("title", "")])
        .await;
    assert_eq!(product_titles(&app).await, ["Mug"]);
}

#[tokio::test]
async fn test_edit_unknown_product() {
    let app = TestApp::spawn().await;
    app.login_admin().await;

    let response = app.get("/admin/edit-product?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body(response).await.contains("Product not found"));

    let response = app
        .post_form("/admin/edit-product?id=42", &[("title", "Ghost")])
        .await;
    assert_eq!(location(&response), Some("/admin/list-products"));
    assert!(product_titles(&app).await.is_empty());
}

#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::spawn().await;
    app.login_admin().await;
    app.post_form("/admin/add-product", &[("title", "Cup")]).await;
    app.post_form("/admin/add-product", &[("title", "Bowl")]).await;

    let response = app.get("/admin/delete-product?id=does-not-exist").await;
    assert_eq!(location(&response), Some("/admin/list-products"));
    let response = app.get("/admin/delete-product").await;
    assert_eq!(location(&response), Some("/admin/list-products"));
    assert_eq!(app.store.count_products().await.ok(), Some(2));

    let cup = app
        .store
        .list_products()
        .await
        .unwrap_or_default()
        .into_iter()
        .find(|p| p.title == "Cup")
        .map(|p| p.id.to_string())
        .unwrap_or_default();
    let response = app.get(&format!("/admin/delete-product?id={cup}")).await;
    assert_eq!(location(&response), Some("/admin/list-products"));
    assert_eq!(product_titles(&app).await, ["Bowl"]);
}
