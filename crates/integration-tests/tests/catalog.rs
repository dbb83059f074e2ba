//! Catalog access control and validation against a real database.
//!
//! Run with: cargo test -p simpletobuy-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use simpletobuy_integration_tests::TestApp;
use sqlx::PgPool;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_and_list_products(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;

    let first = app.create_product(&admin, "Kvass", 100.0).await;
    let second = app.create_product(&admin, "Bread", 19.999).await;

    let (status, body) = app.request(Method::GET, "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": first, "name": "Kvass", "description": "", "price": "100.00" },
            { "id": second, "name": "Bread", "description": "", "price": "20.00" },
        ])
    );

    let (status, body) = app
        .request(Method::GET, &format!("/product/{second}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bread");
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_missing_product_is_404(pool: PgPool) {
    let app = TestApp::new(pool);

    let (status, body) = app.request(Method::GET, "/product/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Product not found" }));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_non_admin_mutations_are_forbidden(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;
    let customer = app.signup("ivan@example.com", "Ivan Petrov").await;
    let id = app.create_product(&admin, "Kvass", 100.0).await;

    let attempts = [
        (
            Method::POST,
            "/product".to_owned(),
            Some(json!({ "name": "Forged", "price": 1 })),
        ),
        (
            Method::PATCH,
            format!("/product/{id}"),
            Some(json!({ "price": 1 })),
        ),
        (Method::DELETE, format!("/product/{id}"), None),
    ];

    for (method, uri, body) in attempts {
        let (status, response) = app
            .request(method.clone(), &uri, Some(&customer), body)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(response, json!({ "message": "Forbidden for you" }));
    }

    let (_, product) = app
        .request(Method::GET, &format!("/product/{id}"), None, None)
        .await;
    assert_eq!(product["price"], "100.00");
    assert_eq!(app.count("products", "").await, 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_non_finite_price_update_leaves_price_unchanged(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;
    let id = app.create_product(&admin, "Kvass", 100.0).await;

    for price in ["Infinity", "-Infinity", "NaN"] {
        let (status, body) = app
            .request(
                Method::PATCH,
                &format!("/product/{id}"),
                Some(&admin),
                Some(json!({ "price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{price}");
        assert!(body["price"].is_string());
    }

    let (_, product) = app
        .request(Method::GET, &format!("/product/{id}"), None, None)
        .await;
    assert_eq!(product["price"], "100.00");
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_negative_and_oversized_prices_rejected(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;

    for price in [json!(-1), json!("-0.5"), json!(1e12)] {
        let (status, body) = app
            .request(
                Method::POST,
                "/product",
                Some(&admin),
                Some(json!({ "name": "Kvass", "price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{price}");
        assert!(body["price"].is_string());
    }

    assert_eq!(app.count("products", "").await, 0);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_partial_update_changes_only_supplied_fields(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;
    let id = app.create_product(&admin, "Kvass", 100.0).await;

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/product/{id}"),
            Some(&admin),
            Some(json!({ "description": "Cold" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": id, "name": "Kvass", "description": "Cold", "price": "100.00" })
    );

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/product/{id}"),
            Some(&admin),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "No input provided" }));

    let (status, _) = app
        .request(
            Method::PATCH,
            "/product/999",
            Some(&admin),
            Some(json!({ "name": "Ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_cascades_cart_lines(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;
    let customer = app.signup("ivan@example.com", "Ivan Petrov").await;
    let id = app.create_product(&admin, "Kvass", 100.0).await;
    app.add_to_cart(&customer, id).await;

    let (status, body) = app
        .request(Method::DELETE, &format!("/product/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Product deleted successfully" }));
    assert_eq!(app.count("cart", "").await, 0);

    let (status, _) = app
        .request(Method::DELETE, &format!("/product/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_refused_for_ordered_product(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;
    let customer = app.signup("ivan@example.com", "Ivan Petrov").await;
    let id = app.create_product(&admin, "Kvass", 100.0).await;
    app.add_to_cart(&customer, id).await;
    let (status, _) = app.request(Method::POST, "/order", Some(&customer), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(Method::DELETE, &format!("/product/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    assert_eq!(app.count("products", "").await, 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_non_admin_refused_whatever_the_body(pool: PgPool) {
    let app = TestApp::new(pool);
    let admin = app.signup_admin("admin@example.com").await;
    let customer = app.signup("ivan@example.com", "Ivan Petrov").await;
    let id = app.create_product(&admin, "Kvass", 100.0).await;

    let attempts = [
        (Method::POST, "/product".to_owned(), json!({})),
        (Method::POST, "/product".to_owned(), json!({ "name": 5 })),
        (Method::PATCH, format!("/product/{id}"), json!({ "price": [1] })),
        (Method::PATCH, format!("/product/{id}"), json!({})),
    ];

    for (method, uri, body) in attempts {
        let (status, response) = app
            .request(method.clone(), &uri, Some(&customer), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri} {body}");
        assert_eq!(response, json!({ "message": "Forbidden for you" }));
    }

    let (status, _) = app
        .request(Method::POST, "/product", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.count("products", "").await, 1);
}
