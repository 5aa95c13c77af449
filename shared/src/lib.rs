//! Shared types for the NearNow storefront core
//!
//! Common types used across crates: product/cart/order models and
//! user-facing error codes.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
