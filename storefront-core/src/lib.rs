//! Storefront core - cart, pricing, checkout and order reconciliation
//!
//! The engineering core of the NearNow mobile storefront, stripped of
//! any presentation concerns. It owns:
//!
//! - Quantity policy for discrete vs. loose (weight-sold) goods
//! - The session cart: in-memory line items persisted after every
//!   mutation, restored once at startup
//! - The pricing engine (delivery fee / discount thresholds)
//! - The checkout wizard state machine
//! - Order submission and multi-identity order retrieval
//!
//! Screen rendering, navigation, auth and the remote data service are
//! collaborators; the backend is consumed through
//! [`backend::StorefrontBackend`] and local persistence through
//! [`cart::KeyValueStore`].
//!
//! Services are constructed explicitly at session start and passed by
//! reference; there is no ambient global state.

pub mod backend;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod quantity;

pub use backend::{BackendError, InMemoryBackend, StorefrontBackend};
pub use cart::{CartError, CartStore, KeyValueStore};
pub use catalog::{CatalogError, CatalogService};
pub use checkout::{CheckoutDraft, CheckoutError, CheckoutState, CheckoutWizard};
pub use orders::{NewOrder, OrderService};
pub use pricing::{compute_totals, OrderTotals};
pub use quantity::QuantityPolicy;
