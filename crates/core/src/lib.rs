//! SimpleToBuy Core - Shared domain types.
//!
//! This crate provides the types used across all SimpleToBuy components:
//! - `storefront` - JSON API for signup, catalog, cart and orders
//! - `cli` - Command-line tools for migrations and operator tasks
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O,
//! no database access, no HTTP. Everything a request body can carry is parsed
//! into one of these types before any storage call is made.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, names and tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
