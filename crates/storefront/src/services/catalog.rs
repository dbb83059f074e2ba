//! Catalog service.
//!
//! Reads are public. Mutations require an admin actor; the privilege check
//! happens before input validation and before any storage call.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use simpletobuy_core::{Price, PriceError, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{Product, ProductChanges, ProductDraft, User};
use crate::services::FieldErrors;

/// Longest accepted product name, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The actor is not an admin.
    #[error("forbidden")]
    Forbidden,

    /// Input failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A partial update supplied no fields.
    #[error("no input provided")]
    NoInput,

    /// The product does not exist.
    #[error("product not found")]
    NotFound,

    /// The operation conflicts with existing rows.
    #[error("{0}")]
    Conflict(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A price as it arrives on the wire: a JSON number or a numeric string.
///
/// Strings such as `"Infinity"` and `"NaN"` are accepted here and rejected
/// by [`PriceInput::parse`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Validate into a [`Price`].
    ///
    /// # Errors
    ///
    /// Returns `PriceError` for non-finite, negative, oversized or
    /// unparseable values.
    pub fn parse(&self) -> Result<Price, PriceError> {
        match self {
            Self::Number(value) => Price::from_f64(*value),
            Self::Text(text) => text.trim().parse(),
        }
    }
}

/// Body of a product creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: PriceInput,
}

/// Body of a partial product update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<PriceInput>,
}

impl ProductPatch {
    /// True when no field was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}

fn validate_name(name: &str) -> Result<String, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("name cannot be empty");
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err("name must be at most 255 characters");
    }
    Ok(name.to_owned())
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// List every product, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the read fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if it doesn't exist.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products.get(id).await?.ok_or(CatalogError::NotFound)
    }

    /// Create a product owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Forbidden` if `actor` is not an admin.
    /// Returns `CatalogError::Validation` for an empty name or invalid price.
    pub async fn create_product(
        &self,
        actor: &User,
        input: &NewProduct,
    ) -> Result<Product, CatalogError> {
        require_admin(actor)?;

        let mut errors = FieldErrors::new();
        let name = errors.check("name", validate_name(&input.name));
        let price = errors.check("price", input.price.parse());

        let (Some(name), Some(price)) = (name, price) else {
            return Err(CatalogError::Validation(errors));
        };

        let draft = ProductDraft {
            name,
            description: input.description.clone().unwrap_or_default(),
            price,
        };

        let product = self.products.create(&draft, Some(actor.id)).await?;
        tracing::info!(product_id = %product.id, user_id = %actor.id, "Product created");

        Ok(product)
    }

    /// Apply a partial update. Only supplied fields change.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Forbidden` if `actor` is not an admin.
    /// Returns `CatalogError::NoInput` if `patch` supplies nothing.
    /// Returns `CatalogError::Validation` for an invalid supplied field.
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn update_product(
        &self,
        actor: &User,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, CatalogError> {
        require_admin(actor)?;

        if patch.is_empty() {
            return Err(CatalogError::NoInput);
        }

        let mut errors = FieldErrors::new();
        let changes = ProductChanges {
            name: patch
                .name
                .as_deref()
                .and_then(|name| errors.check("name", validate_name(name))),
            description: patch.description.clone(),
            price: patch
                .price
                .as_ref()
                .and_then(|price| errors.check("price", price.parse())),
        };

        if !errors.is_empty() {
            return Err(CatalogError::Validation(errors));
        }

        let product = self
            .products
            .update(id, &changes)
            .await
            .map_err(not_found)?;
        tracing::info!(product_id = %product.id, user_id = %actor.id, "Product updated");

        Ok(product)
    }

    /// Delete a product and, by cascade, every cart line holding it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Forbidden` if `actor` is not an admin.
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    /// Returns `CatalogError::Conflict` if past orders reference it.
    pub async fn delete_product(&self, actor: &User, id: ProductId) -> Result<(), CatalogError> {
        require_admin(actor)?;

        self.products.delete(id).await.map_err(not_found)?;
        tracing::info!(product_id = %id, user_id = %actor.id, "Product deleted");

        Ok(())
    }
}

fn require_admin(actor: &User) -> Result<(), CatalogError> {
    if actor.is_admin {
        Ok(())
    } else {
        tracing::info!(user_id = %actor.id, "Catalog mutation refused: not an admin");
        Err(CatalogError::Forbidden)
    }
}

fn not_found(e: RepositoryError) -> CatalogError {
    match e {
        RepositoryError::NotFound => CatalogError::NotFound,
        RepositoryError::Conflict(message) => CatalogError::Conflict(message),
        other => CatalogError::Repository(other),
    }
}
