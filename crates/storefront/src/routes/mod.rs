//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness
//! GET    /health/ready         - Readiness (database reachable)
//!
//! # Auth
//! POST   /signup               - Register, returns a token
//! POST   /login                - Login, returns a token
//! POST   /logout               - Revoke the presented token (auth)
//!
//! # Profile (auth)
//! GET    /profile              - Show own profile
//! PATCH  /profile              - Partially update own profile
//!
//! # Catalog
//! GET    /products             - Product listing
//! GET    /product/{id}         - Product detail
//! POST   /product              - Create (admin)
//! PATCH  /product/{id}         - Partial update (admin)
//! DELETE /product/{id}         - Delete (admin)
//!
//! # Cart (auth)
//! GET    /cart                 - Own cart lines
//! POST   /cart/{product_id}    - Add one unit
//! DELETE /cart/{id}            - Remove one line
//!
//! # Orders (auth)
//! POST   /order                - Place an order from the cart
//! GET    /order                - Own order history
//! ```

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// `{"message": ...}` success body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(profile::show).patch(profile::update))
        .route("/products", get(products::index))
        .route("/product", post(products::create))
        .route(
            "/product/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/cart", get(cart::show))
        .route("/cart/{id}", post(cart::add).delete(cart::remove))
        .route("/order", get(orders::index).post(orders::place))
}
