//! Seed the catalog with demo products.
//!
//! Only runs against an empty catalog, so it is safe to repeat.

use simpletobuy_core::Price;
use simpletobuy_storefront::db::ProductRepository;
use simpletobuy_storefront::models::ProductDraft;
use sqlx::PgPool;

use super::CliError;

/// Demo catalog: `(name, description, price)`.
const DEMO_PRODUCTS: &[(&str, &str, u32)] = &[
    ("Квас благодей", "Для здоровья людей", 100),
    ("Хлеб", "Обычный серый хлеб", 200),
];

/// Insert [`DEMO_PRODUCTS`] if the catalog is empty.
///
/// Returns the number of products inserted.
///
/// # Errors
///
/// Returns `CliError::Repository` if a read or insert fails.
pub async fn run(pool: &PgPool) -> Result<usize, CliError> {
    let products = ProductRepository::new(pool);

    let existing = products.count().await?;
    if existing > 0 {
        tracing::info!(existing, "Catalog is not empty, skipping seed");
        return Ok(0);
    }

    for (name, description, price) in DEMO_PRODUCTS {
        let draft = ProductDraft {
            name: (*name).to_owned(),
            description: (*description).to_owned(),
            price: Price::from_f64(f64::from(*price))
                .map_err(|e| CliError::Validation(super::FieldErrors::single("price", e)))?,
        };
        let product = products.create(&draft, None).await?;
        tracing::info!(product_id = %product.id, "Seeded {}", product.name);
    }

    Ok(DEMO_PRODUCTS.len())
}
