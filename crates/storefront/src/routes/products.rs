//! Catalog route handlers.
//!
//! Listing and detail are public; create, update and delete need an admin
//! bearer session.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use simpletobuy_core::ProductId;

use crate::error::{ApiJson, ApiPath, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::services::{CatalogService, NewProduct, ProductPatch};
use crate::state::AppState;

use super::MessageResponse;

/// Response to a successful product creation.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: ProductId,
}

/// List every product.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool()).list_products().await?;
    Ok(Json(products))
}

/// Show one product.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool()).get_product(id).await?;
    Ok(Json(product))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(body): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let product = CatalogService::new(state.pool())
        .create_product(&admin, &body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Product created successfully",
            id: product.id,
        }),
    ))
}

/// Partially update a product.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool())
        .update_product(&admin, id, &patch)
        .await?;
    Ok(Json(product))
}

/// Delete a product.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.pool())
        .delete_product(&admin, id)
        .await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
