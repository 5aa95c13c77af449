//! Order submission and reconciliation
//!
//! # Submission
//!
//! ```text
//! submit(new_order)
//!     ├─ 1. Ask the backend for the next order number (atomic per day)
//!     ├─ 2. Assemble the immutable order payload
//!     ├─ 3. Insert and return the stored record
//!     └─ (any failure aborts: no order exists without a valid number)
//! ```
//!
//! Submission never touches the cart. Clearing it on success is the
//! checkout wizard's job, so a failed submission leaves the cart
//! intact for retry.
//!
//! # Reconciliation
//!
//! A user's orders may have been placed under any subset of their
//! identity keys (guest checkout later linked to an account). Retrieval
//! runs one lookup per available key concurrently, skips individual
//! failures, dedups by order id and sorts newest first.

use chrono::Utc;
use futures::future::join_all;
use shared::models::{
    OrderItem, OrderPayload, OrderRecord, OrderStatus, PaymentMethod, PaymentStatus,
    ShippingAddress, UserIdentity,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{BackendResult, StorefrontBackend};
use crate::pricing::OrderTotals;

/// Order number prefix: `NN` + `YYYYMMDD`, suffix assigned by the backend
const ORDER_NUMBER_PREFIX: &str = "NN";

/// Everything the wizard hands over for one submission
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub totals: OrderTotals,
}

/// Order submission and retrieval over the backend
pub struct OrderService {
    backend: Arc<dyn StorefrontBackend>,
}

impl OrderService {
    pub fn new(backend: Arc<dyn StorefrontBackend>) -> Self {
        Self { backend }
    }

    fn date_prefix() -> String {
        format!("{}{}", ORDER_NUMBER_PREFIX, Utc::now().format("%Y%m%d"))
    }

    /// Submit a new order
    ///
    /// Obtains the order number first; if that fails the submission is
    /// aborted and nothing is written.
    pub async fn submit(&self, new_order: NewOrder) -> BackendResult<OrderRecord> {
        let order_number = self
            .backend
            .create_order_number(&Self::date_prefix())
            .await?;

        let payload = OrderPayload {
            user_id: new_order.user_id,
            customer_name: new_order.customer_name,
            customer_email: new_order.customer_email,
            customer_phone: new_order.customer_phone,
            order_status: OrderStatus::Placed,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            order_number,
            subtotal: new_order.totals.subtotal,
            delivery_fee: new_order.totals.delivery_fee,
            discount: new_order.totals.discount,
            order_total: new_order.totals.total,
            items: new_order.items,
            shipping_address: new_order.shipping_address,
            created_at: Utc::now(),
        };

        let record = self.backend.insert_order(payload).await?;
        info!(order_number = %record.order_number, total = record.order_total, "order placed");
        Ok(record)
    }

    /// All orders for the given identity, merged across identity keys
    ///
    /// Lookups run concurrently; a failing lookup is logged and
    /// excluded rather than failing the whole retrieval. Results are
    /// deduplicated by order id and sorted by creation time descending.
    pub async fn orders_for(&self, identity: &UserIdentity) -> Vec<OrderRecord> {
        let keys = identity.available_keys();
        if keys.is_empty() {
            return Vec::new();
        }

        let lookups = keys.iter().map(|(key, value)| {
            let backend = Arc::clone(&self.backend);
            let key = *key;
            let value = value.clone();
            async move { (key, backend.query_orders(key, &value).await) }
        });

        let mut merged: Vec<OrderRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (key, result) in join_all(lookups).await {
            match result {
                Ok(orders) => {
                    for order in orders {
                        if seen.insert(order.id.clone()) {
                            merged.push(order);
                        }
                    }
                }
                Err(err) => {
                    // Partial results beat total failure
                    warn!(column = key.column(), %err, "order lookup failed, skipping");
                }
            }
        }

        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use shared::models::IdentityKey;

    fn new_order(phone: &str, email: Option<&str>, user_id: Option<&str>) -> NewOrder {
        NewOrder {
            user_id: user_id.map(str::to_string),
            customer_name: "Asha".to_string(),
            customer_email: email.map(str::to_string),
            customer_phone: phone.to_string(),
            items: vec![OrderItem {
                product_id: "apples".to_string(),
                name: "Apples".to_string(),
                price: 120.0,
                quantity: 0.5,
                image: None,
            }],
            shipping_address: ShippingAddress {
                address: "12 Lake Road".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                pincode: "411001".to_string(),
            },
            totals: crate::pricing::compute_totals(60.0),
        }
    }

    #[tokio::test]
    async fn test_submit_assigns_sequential_numbers() {
        let backend = InMemoryBackend::new();
        let service = OrderService::new(Arc::new(backend));

        let first = service.submit(new_order("111", None, None)).await.unwrap();
        let second = service.submit(new_order("111", None, None)).await.unwrap();

        let date = Utc::now().format("%Y%m%d").to_string();
        assert_eq!(first.order_number, format!("NN{date}0001"));
        assert_eq!(second.order_number, format!("NN{date}0002"));
        assert_eq!(first.order_status, OrderStatus::Placed);
        assert_eq!(first.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_order_number_failure_writes_nothing() {
        let backend = InMemoryBackend::new();
        backend.fail_order_numbers(true);
        let service = OrderService::new(Arc::new(backend.clone()));

        let result = service.submit(new_order("111", None, None)).await;
        assert!(result.is_err());
        assert!(backend.orders().is_empty(), "no order without a valid number");
    }

    #[tokio::test]
    async fn test_orders_merge_dedups_by_id() {
        let backend = InMemoryBackend::new();
        let service = OrderService::new(Arc::new(backend));

        // Same phone and email: both lookups return the same order
        service
            .submit(new_order("111", Some("a@example.com"), Some("u1")))
            .await
            .unwrap();

        let identity = UserIdentity {
            user_id: Some("u1".to_string()),
            phone: Some("111".to_string()),
            email: Some("a@example.com".to_string()),
        };
        let orders = service.orders_for(&identity).await;
        assert_eq!(orders.len(), 1, "the same order id must appear exactly once");
    }

    #[tokio::test]
    async fn test_failed_lookup_yields_partial_results() {
        let backend = InMemoryBackend::new();
        let service = OrderService::new(Arc::new(backend.clone()));

        service
            .submit(new_order("111", None, Some("u1")))
            .await
            .unwrap();
        backend.fail_queries_for(IdentityKey::UserId);

        let identity = UserIdentity {
            user_id: Some("u1".to_string()),
            phone: Some("111".to_string()),
            email: None,
        };
        let orders = service.orders_for(&identity).await;
        assert_eq!(orders.len(), 1, "phone lookup still finds the order");
    }

    #[tokio::test]
    async fn test_orders_sorted_newest_first() {
        let backend = InMemoryBackend::new();
        let service = OrderService::new(Arc::new(backend));

        let first = service.submit(new_order("111", None, None)).await.unwrap();
        let second = service.submit(new_order("111", None, None)).await.unwrap();

        let identity = UserIdentity {
            phone: Some("111".to_string()),
            ..Default::default()
        };
        let orders = service.orders_for(&identity).await;
        assert_eq!(orders.len(), 2);
        assert!(
            orders[0].created_at >= orders[1].created_at,
            "orders must come back newest first"
        );
        assert!(orders.iter().any(|o| o.id == first.id));
        assert!(orders.iter().any(|o| o.id == second.id));
    }

    #[tokio::test]
    async fn test_no_identity_keys_returns_empty() {
        let backend = InMemoryBackend::new();
        let service = OrderService::new(Arc::new(backend));
        let orders = service.orders_for(&UserIdentity::default()).await;
        assert!(orders.is_empty());
    }
}
