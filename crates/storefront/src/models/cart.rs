//! Cart types.

use serde::Serialize;

use simpletobuy_core::{CartItemId, Price, ProductId};

/// One cart row joined with the product's current name, description and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
}
