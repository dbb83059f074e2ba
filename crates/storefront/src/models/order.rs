//! Order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use simpletobuy_core::{OrderId, ProductId};

/// A placed order: the product multiset and total frozen at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    /// One entry per ordered unit, in cart order.
    pub products: Vec<ProductId>,
    /// Sum of the product prices when the order was placed.
    pub order_price: Decimal,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}
