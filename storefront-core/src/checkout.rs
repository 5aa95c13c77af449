//! Checkout wizard - linear multi-step flow from cart to placed order
//!
//! ```text
//! Idle ──start──► Address ──next──► Payment ──next──► Review
//!                    ▲                 ▲                │
//!                    └─────back────────┴────────back────┘
//!                                              submit │
//!                                                     ▼
//!                                   Submitting ──► Submitted
//! ```
//!
//! Starting requires a non-empty cart. Step fields are collected into a
//! draft that survives backward navigation and is validated in full at
//! submission, not per step. On success the wizard clears the cart and
//! discards the draft; on any failure the cart is left intact for
//! retry and the wizard returns to `Review`.
//!
//! The draft is never persisted: a process restart mid-wizard loses the
//! step position and all entered fields. Abandoning an in-flight
//! submission means dropping the future; the server-side write may
//! still complete, the core just never acts on its result.

use shared::error::{StoreErrorCode, UserFacingError};
use shared::models::{OrderItem, PaymentMethod, ShippingAddress};
use thiserror::Error;
use tracing::info;

use crate::backend::BackendError;
use crate::cart::CartStore;
use crate::orders::{NewOrder, OrderService};
use crate::pricing::compute_totals;

/// Wizard states, in flow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// No checkout in progress
    #[default]
    Idle,
    Address,
    Payment,
    Review,
    /// Submission in flight
    Submitting,
    /// Terminal: order placed, cart cleared
    Submitted,
}

/// Mutable accumulation of checkout fields
///
/// All fields except `email` are required at submission. Only cash on
/// delivery exists, so the payment step is a formality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutDraft {
    /// Check all required fields, reporting the first missing one
    fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(field));
            }
        }
        Ok(())
    }

    fn email_opt(&self) -> Option<String> {
        let email = self.email.trim();
        (!email.is_empty()).then(|| email.to_string())
    }

    fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("cannot {action} while checkout is {state:?}")]
    InvalidState {
        state: CheckoutState,
        action: &'static str,
    },

    #[error("order submission failed")]
    Backend(#[from] BackendError),
}

impl UserFacingError for CheckoutError {
    fn code(&self) -> StoreErrorCode {
        match self {
            Self::EmptyCart | Self::MissingField(_) | Self::InvalidState { .. } => {
                StoreErrorCode::Validation
            }
            Self::Backend(_) => StoreErrorCode::Backend,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::MissingField(_) => "Please fill all required fields".to_string(),
            Self::InvalidState { .. } => StoreErrorCode::Validation.default_message().to_string(),
            Self::Backend(_) => "Failed to place order".to_string(),
        }
    }
}

/// The checkout state machine
///
/// Owns the draft for exactly one checkout attempt. Constructed per
/// session and passed by reference; there is no ambient instance.
#[derive(Debug, Default)]
pub struct CheckoutWizard {
    state: CheckoutState,
    draft: CheckoutDraft,
}

impl CheckoutWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn draft(&self) -> &CheckoutDraft {
        &self.draft
    }

    /// Fields are filled in as the user types; no per-step validation
    pub fn draft_mut(&mut self) -> &mut CheckoutDraft {
        &mut self.draft
    }

    /// Begin checkout from a non-empty cart
    pub fn start(&mut self, cart: &CartStore) -> Result<CheckoutState, CheckoutError> {
        if self.state != CheckoutState::Idle {
            return Err(CheckoutError::InvalidState {
                state: self.state,
                action: "start",
            });
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.state = CheckoutState::Address;
        Ok(self.state)
    }

    /// Advance one step; validation is deferred to submission
    pub fn next(&mut self) -> Result<CheckoutState, CheckoutError> {
        self.state = match self.state {
            CheckoutState::Address => CheckoutState::Payment,
            CheckoutState::Payment => CheckoutState::Review,
            state => {
                return Err(CheckoutError::InvalidState {
                    state,
                    action: "advance",
                });
            }
        };
        Ok(self.state)
    }

    /// Step backward, preserving every entered field
    pub fn back(&mut self) -> CheckoutState {
        self.state = match self.state {
            CheckoutState::Review => CheckoutState::Payment,
            CheckoutState::Payment => CheckoutState::Address,
            state => state,
        };
        self.state
    }

    /// Abandon the checkout: draft discarded, cart untouched
    pub fn cancel(&mut self) {
        self.state = CheckoutState::Idle;
        self.draft = CheckoutDraft::default();
    }

    /// Confirm at `Review`: validate, submit, clear the cart
    ///
    /// Validation failure reports the missing field and stays at
    /// `Review`; so does a backend failure, with the cart intact for
    /// retry. Success clears the cart, discards the draft and ends at
    /// `Submitted`.
    pub async fn submit(
        &mut self,
        cart: &mut CartStore,
        orders: &OrderService,
        user_id: Option<String>,
    ) -> Result<shared::models::OrderRecord, CheckoutError> {
        if self.state != CheckoutState::Review {
            return Err(CheckoutError::InvalidState {
                state: self.state,
                action: "submit",
            });
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.draft.validate()?;

        let items: Vec<OrderItem> = cart
            .items()
            .iter()
            .map(|item| OrderItem {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                price: item.unit_price,
                quantity: item.quantity,
                image: item.image.clone(),
            })
            .collect();

        // The same pricing function the cart summary uses; the two
        // views can never disagree.
        let totals = compute_totals(cart.subtotal());

        let new_order = NewOrder {
            user_id,
            customer_name: self.draft.name.clone(),
            customer_email: self.draft.email_opt(),
            customer_phone: self.draft.phone.clone(),
            items,
            shipping_address: self.draft.shipping_address(),
            totals,
        };

        self.state = CheckoutState::Submitting;
        let record = match orders.submit(new_order).await {
            Ok(record) => record,
            Err(err) => {
                self.state = CheckoutState::Review;
                return Err(err.into());
            }
        };

        cart.clear();
        self.draft = CheckoutDraft::default();
        self.state = CheckoutState::Submitted;
        info!(order_number = %record.order_number, "checkout complete");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::cart::MemoryStore;
    use shared::models::Product;
    use std::sync::Arc;

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price,
            original_price: None,
            description: None,
            image_url: None,
            category: "Groceries".to_string(),
            in_stock: true,
            rating: None,
            size: None,
            weight: None,
            is_loose: false,
        }
    }

    fn filled_cart() -> CartStore {
        let mut cart = CartStore::new(Box::new(MemoryStore::new()));
        cart.add(&product("a", 200.0), 2.0, false).unwrap();
        cart
    }

    fn fill_draft(wizard: &mut CheckoutWizard) {
        let draft = wizard.draft_mut();
        draft.name = "Asha".to_string();
        draft.phone = "9900112233".to_string();
        draft.address = "12 Lake Road".to_string();
        draft.city = "Pune".to_string();
        draft.state = "MH".to_string();
        draft.pincode = "411001".to_string();
    }

    fn to_review(wizard: &mut CheckoutWizard, cart: &CartStore) {
        wizard.start(cart).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
    }

    #[test]
    fn test_empty_cart_never_leaves_idle() {
        let cart = CartStore::new(Box::new(MemoryStore::new()));
        let mut wizard = CheckoutWizard::new();

        let err = wizard.start(&cart).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(wizard.state(), CheckoutState::Idle);
        assert_eq!(err.user_message(), "Your cart is empty");
    }

    #[test]
    fn test_forward_and_backward_preserve_draft() {
        let cart = filled_cart();
        let mut wizard = CheckoutWizard::new();
        wizard.start(&cart).unwrap();
        wizard.draft_mut().name = "Asha".to_string();

        assert_eq!(wizard.next().unwrap(), CheckoutState::Payment);
        assert_eq!(wizard.next().unwrap(), CheckoutState::Review);
        assert_eq!(wizard.back(), CheckoutState::Payment);
        assert_eq!(wizard.back(), CheckoutState::Address);
        assert_eq!(wizard.back(), CheckoutState::Address, "back at the first step stays");
        assert_eq!(wizard.draft().name, "Asha");
    }

    #[test]
    fn test_advance_past_review_requires_submit() {
        let cart = filled_cart();
        let mut wizard = CheckoutWizard::new();
        to_review(&mut wizard, &cart);
        assert!(matches!(
            wizard.next(),
            Err(CheckoutError::InvalidState { .. })
        ));
        assert_eq!(wizard.state(), CheckoutState::Review);
    }

    #[tokio::test]
    async fn test_submit_with_missing_address_stays_at_review() {
        let mut cart = filled_cart();
        let orders = OrderService::new(Arc::new(InMemoryBackend::new()));
        let mut wizard = CheckoutWizard::new();
        to_review(&mut wizard, &cart);
        fill_draft(&mut wizard);
        wizard.draft_mut().address = "".to_string();

        let err = wizard.submit(&mut cart, &orders, None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingField("address")));
        assert_eq!(wizard.state(), CheckoutState::Review);
        assert!(!cart.is_empty(), "failed validation leaves the cart intact");
    }

    #[tokio::test]
    async fn test_successful_submit_clears_cart_and_draft() {
        let mut cart = filled_cart();
        let backend = InMemoryBackend::new();
        let orders = OrderService::new(Arc::new(backend.clone()));
        let mut wizard = CheckoutWizard::new();
        to_review(&mut wizard, &cart);
        fill_draft(&mut wizard);

        let record = wizard.submit(&mut cart, &orders, None).await.unwrap();

        assert_eq!(wizard.state(), CheckoutState::Submitted);
        assert!(cart.is_empty(), "cart cleared on success");
        assert_eq!(wizard.draft(), &CheckoutDraft::default());
        assert_eq!(record.subtotal, 400.0);
        assert_eq!(record.delivery_fee, 40.0, "400 subtotal still pays delivery");
        assert_eq!(record.order_total, 440.0);
        assert_eq!(backend.orders().len(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_returns_to_review_with_cart_intact() {
        let mut cart = filled_cart();
        let backend = InMemoryBackend::new();
        backend.fail_order_numbers(true);
        let orders = OrderService::new(Arc::new(backend.clone()));
        let mut wizard = CheckoutWizard::new();
        to_review(&mut wizard, &cart);
        fill_draft(&mut wizard);

        let err = wizard.submit(&mut cart, &orders, None).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Backend(_)));
        assert_eq!(err.user_message(), "Failed to place order");
        assert_eq!(wizard.state(), CheckoutState::Review);
        assert!(!cart.is_empty(), "failed submission leaves the cart for retry");
        assert!(backend.orders().is_empty());
    }

    #[tokio::test]
    async fn test_submit_outside_review_is_rejected() {
        let mut cart = filled_cart();
        let orders = OrderService::new(Arc::new(InMemoryBackend::new()));
        let mut wizard = CheckoutWizard::new();
        wizard.start(&cart).unwrap();

        let err = wizard.submit(&mut cart, &orders, None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidState { .. }));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let cart = filled_cart();
        let mut wizard = CheckoutWizard::new();
        wizard.start(&cart).unwrap();
        wizard.draft_mut().name = "Asha".to_string();

        wizard.cancel();
        assert_eq!(wizard.state(), CheckoutState::Idle);
        assert_eq!(wizard.draft().name, "");
        assert!(!cart.is_empty(), "cancel never touches the cart");
    }

    #[tokio::test]
    async fn test_order_snapshot_decoupled_from_cart_items() {
        let mut cart = filled_cart();
        let backend = InMemoryBackend::new();
        let orders = OrderService::new(Arc::new(backend.clone()));
        let mut wizard = CheckoutWizard::new();
        to_review(&mut wizard, &cart);
        fill_draft(&mut wizard);

        let record = wizard.submit(&mut cart, &orders, None).await.unwrap();
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].product_id, "a");
        assert_eq!(record.items[0].quantity, 2.0);
        assert_eq!(record.items[0].price, 200.0);
    }
}
