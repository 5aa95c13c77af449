//! Cart store - authoritative line items for the active session
//!
//! # Lifecycle
//!
//! Created once at session start, hydrated from the persisted snapshot,
//! mutated by every add/update/remove, persisted after every mutation,
//! cleared on successful order submission or an explicit empty-cart
//! action.
//!
//! # Persistence contract
//!
//! Whole-cart snapshot under one fixed key after every mutation. A
//! restore failure (corrupt or absent data) degrades to an empty cart;
//! a write failure is logged and swallowed because the in-memory state
//! stays authoritative for the session.

use shared::models::{CartItem, Product};
use thiserror::Error;
use tracing::{debug, warn};

use super::storage::KeyValueStore;
use crate::money;
use crate::quantity::{QuantityError, QuantityPolicy};

/// Fixed storage key for the whole-cart snapshot
pub const CART_STORAGE_KEY: &str = "nearNowCartItems";

#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

impl shared::error::UserFacingError for CartError {
    fn code(&self) -> shared::error::StoreErrorCode {
        shared::error::StoreErrorCode::Validation
    }
}

/// The session cart
///
/// Exclusively owned by the active session and mutated through
/// `&mut self` only, which serializes persistence writes without
/// locking. Quantities are written exclusively through
/// [`QuantityPolicy`], so no line can ever hold an invalid quantity.
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Box<dyn KeyValueStore>,
}

impl CartStore {
    /// Create the store and hydrate it from the persisted snapshot
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        let items = Self::hydrate(storage.as_ref());
        Self { items, storage }
    }

    fn hydrate(storage: &dyn KeyValueStore) -> Vec<CartItem> {
        match storage.get_item(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => {
                    let restored: Vec<CartItem> = items
                        .into_iter()
                        .filter(|item| item.quantity > 0.0)
                        .collect();
                    debug!(lines = restored.len(), "cart hydrated from storage");
                    restored
                }
                Err(err) => {
                    warn!(%err, "corrupt cart snapshot, starting with an empty cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "cart restore failed, starting with an empty cart");
                Vec::new()
            }
        }
    }

    /// Line items in stable display order (insertion order)
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over all lines (the cart badge)
    pub fn count(&self) -> f64 {
        money::cart_count(&self.items)
    }

    /// `Σ unit_price * quantity`, recomputed on every call
    pub fn subtotal(&self) -> f64 {
        money::cart_subtotal(&self.items)
    }

    /// Add a product to the cart
    ///
    /// Merges into an existing line with the same `(product_id,
    /// is_loose)` key, otherwise snapshots the product into a new line.
    /// A quantity below the policy minimum is rejected and the cart is
    /// left untouched; user input is never silently altered.
    pub fn add(&mut self, product: &Product, quantity: f64, is_loose: bool) -> Result<(), CartError> {
        let policy = QuantityPolicy::for_mode(is_loose);
        let quantity = policy.validate(quantity)?;

        match self
            .items
            .iter_mut()
            .find(|item| item.matches(&product.id, is_loose))
        {
            Some(item) => {
                item.quantity = policy.round(item.quantity + quantity);
                debug!(product_id = %product.id, quantity = item.quantity, "cart line incremented");
            }
            None => {
                self.items
                    .push(CartItem::from_product(product, quantity, is_loose));
                debug!(product_id = %product.id, quantity, is_loose, "cart line added");
            }
        }

        self.persist();
        Ok(())
    }

    /// Add one discrete unit of a product
    pub fn add_unit(&mut self, product: &Product) -> Result<(), CartError> {
        self.add(product, 1.0, false)
    }

    /// Remove the line matching the full `(product_id, is_loose)` key
    ///
    /// Idempotent: removing an absent line is a no-op.
    pub fn remove(&mut self, product_id: &str, is_loose: bool) {
        let before = self.items.len();
        self.items.retain(|item| !item.matches(product_id, is_loose));
        if self.items.len() != before {
            debug!(product_id, is_loose, "cart line removed");
            self.persist();
        }
    }

    /// Remove every variant of a product, loose and discrete alike
    ///
    /// Single-key removal is ambiguous when both purchasing modes are
    /// in the cart, so this form drops all of them rather than an
    /// arbitrary one. Prefer [`CartStore::remove`].
    pub fn remove_all_variants(&mut self, product_id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        if self.items.len() != before {
            debug!(product_id, "all cart variants removed");
            self.persist();
        }
    }

    /// Overwrite a line's quantity
    ///
    /// The quantity passes through the policy: it is rounded, a value
    /// below the minimum removes the line, and an invalid value (e.g.
    /// fractional units of a discrete item) is rejected with the cart
    /// unchanged. Setting an absent line is a no-op.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        is_loose: bool,
        quantity: f64,
    ) -> Result<(), CartError> {
        let policy = QuantityPolicy::for_mode(is_loose);

        let quantity = match policy.validate(quantity) {
            Ok(q) => q,
            Err(QuantityError::BelowMinimum { .. }) => {
                // Below the minimum is not a smaller quantity, it is removal
                self.remove(product_id, is_loose);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, is_loose))
        {
            item.quantity = quantity;
            debug!(product_id, quantity, "cart quantity set");
            self.persist();
        }
        Ok(())
    }

    /// Step a line down by one policy increment
    ///
    /// Stepping below the minimum removes the line, mirroring the
    /// minus button in the UI.
    pub fn decrease(&mut self, product_id: &str, is_loose: bool) {
        let policy = QuantityPolicy::for_mode(is_loose);

        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, is_loose))
        else {
            return;
        };

        let next = policy.round(item.quantity - policy.increment());
        if next < policy.minimum() {
            self.remove(product_id, is_loose);
        } else {
            item.quantity = next;
            debug!(product_id, quantity = next, "cart quantity decreased");
            self.persist();
        }
    }

    /// Empty the cart unconditionally
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            debug!("cart cleared");
        }
        self.persist();
    }

    /// Write the whole-cart snapshot to storage
    ///
    /// Failures are logged and swallowed: the in-memory cart remains
    /// authoritative for the rest of the session.
    fn persist(&mut self) {
        let snapshot = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "failed to serialize cart snapshot");
                return;
            }
        };
        if let Err(err) = self.storage.set_item(CART_STORAGE_KEY, &snapshot) {
            warn!(%err, "failed to persist cart snapshot");
        }
    }
}
