//! Backend data service collaborator
//!
//! The remote service is consumed through one trait: catalog reads,
//! atomic order-number generation, order insertion and per-identity
//! order queries. Timeouts and retries are the implementation's
//! concern; the core only maps failures into [`BackendError`].
//!
//! [`InMemoryBackend`] is the reference implementation used by tests
//! and examples. Its order-number counter reproduces the server-side
//! contract: an atomic per-day sequence keyed by the date prefix.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use shared::error::{StoreErrorCode, UserFacingError};
use shared::models::{
    IdentityKey, OrderPayload, OrderRecord, Product, ProductFilter,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Backend call failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Backend returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl UserFacingError for BackendError {
    fn code(&self) -> StoreErrorCode {
        StoreErrorCode::Backend
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Remote data service consumed by the storefront core
#[async_trait]
pub trait StorefrontBackend: Send + Sync {
    /// Fetch products matching the filter as one flat list
    ///
    /// Pagination happens inside the implementation.
    async fn fetch_products(&self, filter: &ProductFilter) -> BackendResult<Vec<Product>>;

    /// Next order number for the given date prefix
    ///
    /// Must be atomic server-side: the per-day sequence has to stay
    /// unique under concurrent submissions from different devices.
    async fn create_order_number(&self, date_prefix: &str) -> BackendResult<String>;

    /// Persist a new order and return the stored record
    async fn insert_order(&self, payload: OrderPayload) -> BackendResult<OrderRecord>;

    /// All orders whose `key` column equals `value`
    async fn query_orders(&self, key: IdentityKey, value: &str)
        -> BackendResult<Vec<OrderRecord>>;
}

#[derive(Default)]
struct BackendState {
    products: Vec<Product>,
    orders: Vec<OrderRecord>,
    /// Per-date-prefix order sequence
    counters: HashMap<String, u32>,
    /// Identity keys whose lookups fail (for partial-failure tests)
    failing_keys: Vec<IdentityKey>,
    /// When set, `create_order_number` fails
    fail_order_numbers: bool,
}

/// In-memory backend for tests and examples
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog
    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.state.lock().products = products;
        self
    }

    /// Make lookups for the given identity key fail
    pub fn fail_queries_for(&self, key: IdentityKey) {
        self.state.lock().failing_keys.push(key);
    }

    /// Make order-number generation fail
    pub fn fail_order_numbers(&self, fail: bool) {
        self.state.lock().fail_order_numbers = fail;
    }

    /// Stored orders, oldest first (test inspection)
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.state.lock().orders.clone()
    }
}

#[async_trait]
impl StorefrontBackend for InMemoryBackend {
    async fn fetch_products(&self, filter: &ProductFilter) -> BackendResult<Vec<Product>> {
        let state = self.state.lock();
        let products = state
            .products
            .iter()
            .filter(|p| p.in_stock)
            .filter(|p| match filter {
                ProductFilter::All => true,
                ProductFilter::Category(category) => &p.category == category,
                ProductFilter::Search(query) => {
                    p.name.to_lowercase().contains(&query.to_lowercase())
                }
            })
            .cloned()
            .collect();
        Ok(products)
    }

    async fn create_order_number(&self, date_prefix: &str) -> BackendResult<String> {
        let mut state = self.state.lock();
        if state.fail_order_numbers {
            return Err(BackendError::Request(
                "order number service unavailable".to_string(),
            ));
        }
        let counter = state.counters.entry(date_prefix.to_string()).or_insert(0);
        *counter += 1;
        Ok(format!("{}{:04}", date_prefix, counter))
    }

    async fn insert_order(&self, payload: OrderPayload) -> BackendResult<OrderRecord> {
        let record = OrderRecord {
            id: Uuid::new_v4().to_string(),
            order_number: payload.order_number,
            user_id: payload.user_id,
            customer_name: payload.customer_name,
            customer_email: payload.customer_email,
            customer_phone: payload.customer_phone,
            order_status: payload.order_status,
            payment_status: payload.payment_status,
            payment_method: payload.payment_method,
            subtotal: payload.subtotal,
            delivery_fee: payload.delivery_fee,
            discount: payload.discount,
            order_total: payload.order_total,
            items: payload.items,
            shipping_address: payload.shipping_address,
            created_at: payload.created_at,
            updated_at: Some(Utc::now()),
        };
        self.state.lock().orders.push(record.clone());
        Ok(record)
    }

    async fn query_orders(
        &self,
        key: IdentityKey,
        value: &str,
    ) -> BackendResult<Vec<OrderRecord>> {
        let state = self.state.lock();
        if state.failing_keys.contains(&key) {
            return Err(BackendError::Request(format!(
                "query on {} failed",
                key.column()
            )));
        }
        let orders = state
            .orders
            .iter()
            .filter(|order| match key {
                IdentityKey::UserId => order.user_id.as_deref() == Some(value),
                IdentityKey::Phone => order.customer_phone == value,
                IdentityKey::Email => order.customer_email.as_deref() == Some(value),
            })
            .cloned()
            .collect();
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_order_number_counter_is_monotonic_per_prefix() {
        let backend = InMemoryBackend::new();
        let first = backend.create_order_number("NN20260830").await.unwrap();
        let second = backend.create_order_number("NN20260830").await.unwrap();
        let other_day = backend.create_order_number("NN20260831").await.unwrap();

        assert_eq!(first, "NN202608300001");
        assert_eq!(second, "NN202608300002");
        assert_eq!(other_day, "NN202608310001", "each day restarts its sequence");
    }

    #[tokio::test]
    async fn test_fetch_products_filters_out_of_stock() {
        let mut in_stock = test_product("a");
        in_stock.category = "Fruit".to_string();
        let mut gone = test_product("b");
        gone.in_stock = false;

        let backend = InMemoryBackend::new().with_products(vec![in_stock, gone]);
        let all = backend.fetch_products(&ProductFilter::All).await.unwrap();
        assert_eq!(all.len(), 1);

        let fruit = backend
            .fetch_products(&ProductFilter::Category("Fruit".to_string()))
            .await
            .unwrap();
        assert_eq!(fruit.len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let backend = InMemoryBackend::new().with_products(vec![test_product("a")]);
        let hits = backend
            .fetch_products(&ProductFilter::Search("PRODUCT".to_string()))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    fn test_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: 10.0,
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
}
