//! Order route handlers. Every route requires a bearer session.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::services::CartService;
use crate::state::AppState;

/// Response to a successful placement.
#[derive(Debug, Serialize)]
pub struct PlacedResponse {
    pub message: &'static str,
    pub order: Order,
}

/// Turn the caller's cart into an order.
pub async fn place(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<(StatusCode, Json<PlacedResponse>)> {
    let order = CartService::new(state.pool())
        .place_order(&auth.user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlacedResponse {
            message: "Order placed successfully",
            order,
        }),
    ))
}

/// The caller's order history.
pub async fn index(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<Vec<Order>>> {
    let orders = CartService::new(state.pool())
        .list_orders(&auth.user)
        .await?;
    Ok(Json(orders))
}
