//! Cart route handlers. Every route requires a bearer session.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use simpletobuy_core::{CartItemId, ProductId};

use crate::error::{ApiPath, Result};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::services::CartService;
use crate::state::AppState;

use super::MessageResponse;

/// Response to a successful add.
#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub message: &'static str,
    pub id: CartItemId,
}

/// The caller's cart.
pub async fn show(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Vec<CartLine>>> {
    let lines = CartService::new(state.pool()).list_cart(&auth.user).await?;
    Ok(Json(lines))
}

/// Add one unit of a product.
pub async fn add(
    State(state): State<AppState>,
    auth: RequireAuth,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<(StatusCode, Json<AddedResponse>)> {
    let id = CartService::new(state.pool())
        .add_to_cart(&auth.user, product_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddedResponse {
            message: "Added to cart successfully",
            id,
        }),
    ))
}

/// Remove one cart line.
pub async fn remove(
    State(state): State<AppState>,
    auth: RequireAuth,
    ApiPath(id): ApiPath<CartItemId>,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.pool())
        .remove_from_cart(&auth.user, id)
        .await?;
    Ok(Json(MessageResponse::new("Removed from cart successfully")))
}
