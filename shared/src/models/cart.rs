//! Cart Model

use serde::{Deserialize, Serialize};

use super::product::Product;

/// One line in the cart
///
/// Identity for merging is `(product_id, is_loose)`: the same product
/// added once as a discrete unit and once as a loose weight is two
/// distinct lines, because they are different purchasing modes.
///
/// Invariant: `quantity > 0`. A line that would drop to zero or below
/// is removed from the cart instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    /// Product name snapshotted at add time
    pub name: String,
    /// Unit price snapshotted at add time
    pub unit_price: f64,
    /// Units for discrete items, kilograms for loose items
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Pack size / weight label snapshotted for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_label: Option<String>,
    #[serde(default)]
    pub is_loose: bool,
}

impl CartItem {
    /// Snapshot a product into a new cart line
    pub fn from_product(product: &Product, quantity: f64, is_loose: bool) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            image: product.image_url.clone(),
            size_label: product.size_label(),
            is_loose,
        }
    }

    /// Line identity: same product id and same purchasing mode
    pub fn matches(&self, product_id: &str, is_loose: bool) -> bool {
        self.product_id == product_id && self.is_loose == is_loose
    }
}
