//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status (mutated only by the backend after creation)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Placed,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Payment method (cash on delivery is the only supported method)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

/// Order line item, snapshotted from the cart at submission
///
/// Decoupled from live product data so later catalog edits do not
/// alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Shipping address snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Payload for inserting a new order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub order_number: String,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub order_total: f64,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
}

/// Stored order record, immutable on the client once created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    /// Identifier assigned by the backend
    pub id: String,
    /// Human-readable sequential order number (prefix + YYYYMMDD + suffix)
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub order_total: f64,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    /// Number of distinct line items
    pub fn items_count(&self) -> usize {
        self.items.len()
    }
}

/// One identity field an order may have been placed under
///
/// Guest checkouts later linked to an account mean a user's orders can
/// be spread across these keys; retrieval queries each available one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    UserId,
    Phone,
    Email,
}

impl IdentityKey {
    /// Backend column this key queries against
    pub fn column(&self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Phone => "customer_phone",
            Self::Email => "customer_email",
        }
    }
}

/// The identity fields known for the current user, any subset may be set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl UserIdentity {
    /// The `(key, value)` pairs that are actually available
    pub fn available_keys(&self) -> Vec<(IdentityKey, String)> {
        let mut keys = Vec::new();
        if let Some(id) = &self.user_id {
            keys.push((IdentityKey::UserId, id.clone()));
        }
        if let Some(phone) = &self.phone {
            keys.push((IdentityKey::Phone, phone.clone()));
        }
        if let Some(email) = &self.email {
            keys.push((IdentityKey::Email, email.clone()));
        }
        keys
    }
}
