//! Signup, login, logout and session expiry against a real database.
//!
//! Run with: cargo test -p simpletobuy-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use simpletobuy_core::{SessionToken, UserId};
use simpletobuy_integration_tests::{TEST_PASSWORD, TestApp, token_of};
use simpletobuy_storefront::db::SessionRepository;
use sqlx::PgPool;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_signup_invalid_email_creates_nothing(pool: PgPool) {
    let app = TestApp::new(pool);

    let (status, body) = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "ivan-at-example", "password": "pw", "fio": "Ivan Petrov" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Validation error");
    assert!(body["email"].is_string());
    assert_eq!(app.count("users", "").await, 0);
    assert_eq!(app.count("sessions", "").await, 0);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_signup_splits_two_and_three_part_names(pool: PgPool) {
    let app = TestApp::new(pool);

    app.signup("two@example.com", "Ivan Petrov").await;
    app.signup("three@example.com", "Ivan Petrov Sergeevich").await;

    let rows = sqlx::query_as::<_, (String, String, Option<String>)>(
        "SELECT name, surname, middle_name FROM users ORDER BY id",
    )
    .fetch_all(&app.pool)
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            ("Ivan".to_owned(), "Petrov".to_owned(), None),
            (
                "Ivan".to_owned(),
                "Petrov".to_owned(),
                Some("Sergeevich".to_owned())
            ),
        ]
    );
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_signup_rejects_one_and_four_part_names(pool: PgPool) {
    let app = TestApp::new(pool);

    for fio in ["Ivan", "Ivan Petrov Sergeevich Jr"] {
        let (status, body) = app
            .request(
                Method::POST,
                "/signup",
                None,
                Some(json!({ "email": "ivan@example.com", "password": "pw", "fio": fio })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{fio}");
        assert!(body["fio"].is_string());
    }

    assert_eq!(app.count("users", "").await, 0);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_email_is_validation_error(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("ivan@example.com", "Ivan Petrov").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "ivan@example.com", "password": "pw", "fio": "Other Person" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["email"].is_string());
    assert_eq!(app.count("users", "").await, 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_login_token_resolves_to_same_user(pool: PgPool) {
    let app = TestApp::new(pool);
    let signup_token = app.signup("ivan@example.com", "Ivan Petrov").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ivan@example.com", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged in successfully");
    let login_token = token_of(&body);
    assert_ne!(login_token, signup_token);

    let (_, by_signup) = app
        .request(Method::GET, "/profile", Some(&signup_token), None)
        .await;
    let (_, by_login) = app
        .request(Method::GET, "/profile", Some(&login_token), None)
        .await;
    assert_eq!(by_signup["user"]["id"], by_login["user"]["id"]);
    assert_eq!(by_login["user"]["email"], "ivan@example.com");
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_wrong_password_creates_no_session(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("ivan@example.com", "Ivan Petrov").await;
    let before = app.count("sessions", "").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ivan@example.com", "password": "wrong" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Login failed" }));
    assert_eq!(app.count("sessions", "").await, before);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_logout_revokes_only_presented_token(pool: PgPool) {
    let app = TestApp::new(pool);
    let first = app.signup("ivan@example.com", "Ivan Petrov").await;
    let (_, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "ivan@example.com", "password": TEST_PASSWORD })),
        )
        .await;
    let second = token_of(&body);

    let (status, body) = app.request(Method::POST, "/logout", Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Logged out successfully" }));

    let (status, _) = app.request(Method::GET, "/profile", Some(&first), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request(Method::GET, "/profile", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.count("sessions", "").await, 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_expired_session_is_rejected_and_removed(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("ivan@example.com", "Ivan Petrov").await;
    let user_id: i32 = sqlx::query_scalar("SELECT id FROM users")
        .fetch_one(&app.pool)
        .await
        .unwrap();

    let sessions = SessionRepository::new(&app.pool);
    let stale = SessionToken::new("ab".repeat(32));
    sessions
        .create(UserId::new(user_id), &stale, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(sessions.count_for_user(UserId::new(user_id)).await.unwrap(), 2);

    let (status, _) = app
        .request(Method::GET, "/profile", Some(stale.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(sessions.count_for_user(UserId::new(user_id)).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_prune_deletes_only_expired_sessions(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("ivan@example.com", "Ivan Petrov").await;
    let user_id = UserId::new(
        sqlx::query_scalar::<_, i32>("SELECT id FROM users")
            .fetch_one(&app.pool)
            .await
            .unwrap(),
    );

    let sessions = SessionRepository::new(&app.pool);
    sessions
        .create(
            user_id,
            &SessionToken::new("cd".repeat(32)),
            Utc::now() - Duration::hours(2),
        )
        .await
        .unwrap();

    let removed = sessions.delete_expired(Utc::now()).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(sessions.count_for_user(user_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_email_is_case_sensitive(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("Ivan@Example.com", "Ivan Petrov").await;
    app.signup("ivan@example.com", "Ivan Sidorov").await;
    assert_eq!(app.count("users", "").await, 2);

    let (status, _) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "IVAN@EXAMPLE.COM", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "Ivan@Example.com", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = token_of(&body);
    let (_, profile) = app.request(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(profile["user"]["fio"], "Ivan Petrov");
}
