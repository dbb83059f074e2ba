//! Order repository, including the cart-to-order transition.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use simpletobuy_core::{OrderId, ProductId, UserId};

use super::RepositoryError;
use super::users::UserRepository;
use crate::models::Order;

/// Cart row with the product's price at the moment of reading.
#[derive(Debug, sqlx::FromRow)]
struct PricedCartRow {
    id: i32,
    product_id: i32,
    price: Decimal,
}

/// Order row with its product IDs aggregated in item order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_price: Decimal,
    created_at: DateTime<Utc>,
    products: Vec<i32>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            products: row.products.into_iter().map(ProductId::new).collect(),
            order_price: row.order_price,
            created_at: row.created_at,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn a user's cart into an order.
    ///
    /// Runs in one transaction holding a lock on the user's row, so two
    /// placements by the same user cannot consume the same cart lines:
    ///
    /// 1. read the cart joined with current prices
    /// 2. insert the order with the summed total
    /// 3. copy each line's product into `order_items`
    /// 4. delete exactly the lines that were read
    ///
    /// Returns `None` (and writes nothing) if the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` if any statement fails; the cart is
    /// then unchanged.
    pub async fn place(&self, user_id: UserId) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        UserRepository::lock_for_update(&mut *tx, user_id).await?;

        let lines = sqlx::query_as::<_, PricedCartRow>(
            r"
            SELECT c.id, c.product_id, p.price
            FROM cart c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = $1
            ORDER BY c.id
            ",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            tx.rollback().await?;
            return Ok(None);
        }

        let total: Decimal = lines.iter().map(|line| line.price).sum();
        let line_ids: Vec<i32> = lines.iter().map(|line| line.id).collect();
        let product_ids: Vec<i32> = lines.iter().map(|line| line.product_id).collect();

        let (order_id, order_price, created_at) =
            sqlx::query_as::<_, (i32, Decimal, DateTime<Utc>)>(
                r"
                INSERT INTO orders (user_id, order_price)
                VALUES ($1, $2)
                RETURNING id, order_price, created_at
                ",
            )
            .bind(user_id)
            .bind(total)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO order_items (order_id, product_id)
            SELECT $1, item.product_id
            FROM UNNEST($2::int4[]) WITH ORDINALITY AS item(product_id, ord)
            ORDER BY item.ord
            ",
        )
        .bind(order_id)
        .bind(&product_ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart WHERE id = ANY($1)")
            .bind(&line_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(Order {
            id: OrderId::new(order_id),
            products: product_ids.into_iter().map(ProductId::new).collect(),
            order_price,
            created_at,
        }))
    }

    /// List a user's orders, ordered by ID, each with its product IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.order_price, o.created_at,
                   COALESCE(
                       ARRAY_AGG(oi.product_id ORDER BY oi.id)
                           FILTER (WHERE oi.id IS NOT NULL),
                       '{}'
                   ) AS products
            FROM orders o
            LEFT JOIN order_items oi ON oi.order_id = o.id
            WHERE o.user_id = $1
            GROUP BY o.id
            ORDER BY o.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
