//! Catalog types.

use serde::Serialize;

use simpletobuy_core::{Price, ProductId, UserId};

/// A catalog product as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Admin who created the product; cleared if that account is removed.
    #[serde(skip)]
    pub owner_id: Option<UserId>,
}

/// A validated new product.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
}

/// Validated partial product update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
}

impl ProductChanges {
    /// True when no column would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}
