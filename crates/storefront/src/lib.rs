//! SimpleToBuy storefront library.
//!
//! JSON API over `PostgreSQL`: accounts with bearer sessions, a product
//! catalog mutated by admins, per-user carts and order placement.
//!
//! The binary in `main.rs` and the `stb-cli` operator tool both build on
//! this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .fallback(error::not_found)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::Body;
    use axum::http::{Method, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::middleware::REQUEST_ID_HEADER;

    fn test_app() -> Router {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/simpletobuy_unreachable"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            token_secret: SecretString::from("k9Q2vX7mR4tL8wZ1pB6nC3yF5hJ0sD4g"),
            session_ttl: chrono::Duration::hours(1),
            db_max_connections: 1,
            run_migrations: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/simpletobuy_unreachable")
            .unwrap();
        app(AppState::new(config, pool).unwrap())
    }

    async fn send(request: axum::http::Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(method: Method, uri: &str, body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = send(get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Not found" }));
    }

    #[tokio::test]
    async fn test_request_id_generated_and_propagated() {
        let response = test_app().oneshot(get("/health")).await.unwrap();
        let generated = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(generated.len(), 36);

        let request = axum::http::Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "edge-42")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-42");
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer() {
        for (method, uri) in [
            (Method::GET, "/profile"),
            (Method::GET, "/cart"),
            (Method::POST, "/cart/1"),
            (Method::DELETE, "/cart/1"),
            (Method::GET, "/order"),
            (Method::POST, "/order"),
            (Method::POST, "/logout"),
            (Method::POST, "/product"),
            (Method::DELETE, "/product/1"),
        ] {
            let request = axum::http::Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body, json!({ "message": "Login failed" }));
        }
    }

    #[tokio::test]
    async fn test_wrong_auth_scheme_is_unauthorized() {
        let request = axum::http::Request::builder()
            .uri("/profile")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_malformed_json_is_400() {
        let (status, body) = send(json_request(Method::POST, "/signup", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_signup_missing_field_is_422() {
        let (status, body) = send(json_request(
            Method::POST,
            "/signup",
            r#"{"email":"a@b.cd","password":"x"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_signup_invalid_email_reports_field() {
        let (status, body) = send(json_request(
            Method::POST,
            "/signup",
            r#"{"email":"not-an-email","password":"secret","fio":"Ivan Petrov"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Validation error");
        assert!(body["email"].is_string());
        assert!(body.get("fio").is_none());
    }

    #[tokio::test]
    async fn test_login_with_malformed_email_is_401() {
        let (status, body) = send(json_request(
            Method::POST,
            "/login",
            r#"{"email":"nope","password":"secret"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Login failed" }));
    }

    #[tokio::test]
    async fn test_non_integer_product_id_is_404() {
        let (status, body) = send(get("/product/abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Not found" }));
    }
}
