//! Catalog CRUD and cache-aside consistency through the HTTP API

mod common;

use http::StatusCode;
use serde_json::json;
use std::sync::Arc;

use token_server::{AppState, api};

#[tokio::test]
async fn public_catalog_is_cached_and_filtered() {
    let state = common::test_state().await;
    let admin = common::seed_admin(&state, "Root", "root@example.com").await;
    common::seed_product(&state, admin.id, "Ramen", 9.99, true).await;
    common::seed_product(&state, admin.id, "Off menu", 3.0, false).await;
    let app = api::create_router(state.clone());

    let (status, body) = common::send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("database"));
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["data"][0]["name"], json!("Ramen"));

    let (_, body) = common::send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(body["source"], json!("cache"));
    assert_eq!(body["count"], json!(1));
}

#[tokio::test]
async fn admin_catalog_is_unfiltered_and_separately_keyed() {
    let state = common::test_state().await;
    let admin = common::seed_admin(&state, "Root", "root@example.com").await;
    common::seed_product(&state, admin.id, "Ramen", 9.99, true).await;
    common::seed_product(&state, admin.id, "Off menu", 3.0, false).await;
    let app = api::create_router(state.clone());

    // warm the public key only
    let (_, public) = common::send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(public["count"], json!(1));

    // the admin key is still cold and sees everything
    let (status, body) = common::send(&app, "GET", "/api/products/all", Some(admin.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("database"));
    assert_eq!(body["count"], json!(2));

    let (_, body) = common::send(&app, "GET", "/api/products/all", Some(admin.id), None).await;
    assert_eq!(body["source"], json!("cache"));
}

#[tokio::test]
async fn every_product_mutation_invalidates_both_catalogs() {
    let state = common::test_state().await;
    let admin = common::seed_admin(&state, "Root", "root@example.com").await;
    let app = api::create_router(state.clone());

    // create
    let (status, body) = common::send(
        &app,
        "POST",
        "/api/products",
        Some(admin.id),
        Some(json!({ "name": "Ramen", "price": 9.99, "category": "meals" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = body["data"]["id"].as_i64().unwrap();

    // warm both keys
    common::send(&app, "GET", "/api/products", None, None).await;
    common::send(&app, "GET", "/api/products/all", Some(admin.id), None).await;

    // update → both reloaded
    let (status, _) = common::send(
        &app,
        "PUT",
        &format!("/api/products/{product_id}"),
        Some(admin.id),
        Some(json!({ "availability": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, public) = common::send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(public["source"], json!("database"));
    assert_eq!(public["count"], json!(0));

    let (_, all) = common::send(&app, "GET", "/api/products/all", Some(admin.id), None).await;
    assert_eq!(all["source"], json!("database"));
    assert_eq!(all["data"][0]["availability"], json!(false));

    // delete → gone everywhere, idempotent second delete is a 404
    let (status, _) = common::send(
        &app,
        "DELETE",
        &format!("/api/products/{product_id}"),
        Some(admin.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = common::send(&app, "GET", "/api/products/all", Some(admin.id), None).await;
    assert_eq!(all["source"], json!("database"));
    assert_eq!(all["count"], json!(0));

    let (status, _) = common::send(
        &app,
        "DELETE",
        &format!("/api/products/{product_id}"),
        Some(admin.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_survive_product_deletion_with_null_reference() {
    let state = common::test_state().await;
    let admin = common::seed_admin(&state, "Root", "root@example.com").await;
    let user = common::seed_user(&state, "Ana", "ana@example.com").await;
    let product = common::seed_product(&state, admin.id, "Ramen", 9.99, true).await;
    let app = api::create_router(state.clone());

    state.orders.create_order(product.id, user.id).await.unwrap();
    state.catalog.delete(product.id).await.unwrap();

    let (status, body) = common::send(&app, "GET", "/api/orders/my", Some(user.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["data"][0]["product"], json!(null));
    assert_eq!(body["data"][0]["price"].as_f64().unwrap(), 9.99);
}

#[tokio::test]
async fn broken_cache_store_degrades_reads_to_database() {
    let pool = common::test_pool().await;
    let state = AppState::build(pool, Arc::new(common::BrokenCache));
    let admin = common::seed_admin(&state, "Root", "root@example.com").await;
    common::seed_product(&state, admin.id, "Ramen", 9.99, true).await;
    let app = api::create_router(state.clone());

    // every read succeeds, always database-sourced
    for _ in 0..2 {
        let (status, body) = common::send(&app, "GET", "/api/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["source"], json!("database"));
        assert_eq!(body["count"], json!(1));
    }

    // mutations still succeed although invalidation fails underneath
    let (status, _) = common::send(
        &app,
        "POST",
        "/api/products",
        Some(admin.id),
        Some(json!({ "name": "Udon", "price": 8.5, "category": "meals" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn product_admin_routes_are_gated() {
    let state = common::test_state().await;
    let user = common::seed_user(&state, "Ana", "ana@example.com").await;
    let app = api::create_router(state.clone());

    let (status, _) = common::send(&app, "GET", "/api/products/all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::send(
        &app,
        "POST",
        "/api/products",
        Some(user.id),
        Some(json!({ "name": "X", "price": 1.0, "category": "meals" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
