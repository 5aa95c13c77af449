//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (read-only, sourced from the backend catalog)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Current unit price in the store's base currency unit
    pub price: f64,
    /// Pre-discount price, when the product is on offer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: String,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Pack size label (e.g. "500g", "1L")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Weight label, used when `size` is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Sold by continuous weight (kilograms) rather than discrete units
    #[serde(rename = "isLoose", default)]
    pub is_loose: bool,
}

impl Product {
    /// Display label for pack size: `size` preferred, `weight` as fallback
    pub fn size_label(&self) -> Option<String> {
        self.size.clone().or_else(|| self.weight.clone())
    }
}

/// Catalog query filter
///
/// Pagination is the backend's concern; the core always consumes a
/// flat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// All in-stock products
    All,
    /// In-stock products in one category
    Category(String),
    /// Case-insensitive name search over in-stock products
    Search(String),
}
