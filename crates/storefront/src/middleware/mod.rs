//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 3. Request ID (propagate or generate, echo in response)
//!
//! Authentication is an extractor ([`RequireAuth`], [`RequireAdmin`]) rather
//! than a layer, so public routes never touch the sessions table.

pub mod auth;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth, bearer_token};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
