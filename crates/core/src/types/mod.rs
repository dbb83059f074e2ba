//! Core types for SimpleToBuy.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod name;
pub mod price;
pub mod token;

pub use email::{Email, EmailError};
pub use id::*;
pub use name::{FullName, FullNameError};
pub use price::{Price, PriceError};
pub use token::SessionToken;
