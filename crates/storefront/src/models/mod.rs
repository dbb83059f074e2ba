//! Domain models for storefront.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`]. Types that appear in JSON responses derive `Serialize`.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use order::Order;
pub use product::{Product, ProductChanges, ProductDraft};
pub use session::Session;
pub use user::{ProfileChanges, User};
