//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Signup, password login, bearer sessions
//! - `catalog` - Product listing and admin-only mutations
//! - `cart` - Cart lines and order placement
//! - `profile` - Self-service account updates
//!
//! Services validate input into [`FieldErrors`] before calling a repository.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod profile;
pub mod validation;

pub use auth::{AuthError, AuthService, TokenIssuer};
pub use cart::{CartError, CartService};
pub use catalog::{CatalogError, CatalogService, NewProduct, PriceInput, ProductPatch};
pub use profile::{Profile, ProfileError, ProfilePatch, ProfileService};
pub use validation::FieldErrors;
