//! Cart and order service.

use sqlx::PgPool;
use thiserror::Error;

use simpletobuy_core::{CartItemId, ProductId};

use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::models::{CartLine, Order, User};

/// Errors from cart and order operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product to add does not exist.
    #[error("{0}")]
    Conflict(String),

    /// The cart line does not exist or belongs to someone else.
    #[error("cart item not found")]
    LineNotFound,

    /// An order was requested for an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart and order service. Every operation acts on the caller's own rows.
pub struct CartService<'a> {
    cart: CartRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            cart: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Add one unit of `product_id` to the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Conflict` if the product doesn't exist.
    pub async fn add_to_cart(
        &self,
        user: &User,
        product_id: ProductId,
    ) -> Result<CartItemId, CartError> {
        let id = self.cart.add(user.id, product_id).await.map_err(|e| match e {
            RepositoryError::Conflict(message) => CartError::Conflict(message),
            other => CartError::Repository(other),
        })?;

        tracing::debug!(user_id = %user.id, product_id = %product_id, cart_item_id = %id, "Added to cart");

        Ok(id)
    }

    /// Remove one of the caller's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if no line with that ID belongs to
    /// the caller.
    pub async fn remove_from_cart(&self, user: &User, id: CartItemId) -> Result<(), CartError> {
        if !self.cart.remove(user.id, id).await? {
            return Err(CartError::LineNotFound);
        }

        tracing::debug!(user_id = %user.id, cart_item_id = %id, "Removed from cart");

        Ok(())
    }

    /// The caller's cart with current product details.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the read fails.
    pub async fn list_cart(&self, user: &User) -> Result<Vec<CartLine>, CartError> {
        Ok(self.cart.list(user.id).await?)
    }

    /// Turn the caller's cart into an order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyCart` if there is nothing to order.
    /// Returns `CartError::Repository` if the transaction fails; the cart is
    /// then unchanged.
    pub async fn place_order(&self, user: &User) -> Result<Order, CartError> {
        let order = self
            .orders
            .place(user.id)
            .await?
            .ok_or(CartError::EmptyCart)?;

        tracing::info!(
            user_id = %user.id,
            order_id = %order.id,
            items = order.products.len(),
            order_price = %order.order_price,
            "Order placed"
        );

        Ok(order)
    }

    /// The caller's orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the read fails.
    pub async fn list_orders(&self, user: &User) -> Result<Vec<Order>, CartError> {
        Ok(self.orders.list(user.id).await?)
    }
}
