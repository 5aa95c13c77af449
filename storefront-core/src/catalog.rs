//! Catalog lookups over the backend
//!
//! Thin read-side service: flat product lists by filter, plus a
//! point lookup that surfaces a miss as `NotFound` instead of letting
//! the flow crash.

use shared::error::{StoreErrorCode, UserFacingError};
use shared::models::{Product, ProductFilter};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::backend::{BackendError, StorefrontBackend};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl UserFacingError for CatalogError {
    fn code(&self) -> StoreErrorCode {
        match self {
            Self::NotFound(_) => StoreErrorCode::NotFound,
            Self::Backend(_) => StoreErrorCode::Backend,
        }
    }
}

/// Read-side catalog service
pub struct CatalogService {
    backend: Arc<dyn StorefrontBackend>,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn StorefrontBackend>) -> Self {
        Self { backend }
    }

    /// All in-stock products
    pub async fn all_products(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self.backend.fetch_products(&ProductFilter::All).await?;
        debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }

    /// In-stock products in one category
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .backend
            .fetch_products(&ProductFilter::Category(category.to_string()))
            .await?)
    }

    /// Name search over in-stock products
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .backend
            .fetch_products(&ProductFilter::Search(query.to_string()))
            .await?)
    }

    /// Point lookup by product id
    ///
    /// A miss is a domain state, not an exception: callers render a
    /// "not found" view.
    pub async fn find_product(&self, product_id: &str) -> Result<Product, CatalogError> {
        let products = self.backend.fetch_products(&ProductFilter::All).await?;
        products
            .into_iter()
            .find(|product| product.id == product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    fn seeded() -> CatalogService {
        let product = Product {
            id: "apples".to_string(),
            name: "Apples".to_string(),
            price: 120.0,
            original_price: None,
            description: None,
            image_url: None,
            category: "Fruit".to_string(),
            in_stock: true,
            rating: Some(4.5),
            size: None,
            weight: Some("per kg".to_string()),
            is_loose: true,
        };
        let backend = InMemoryBackend::new().with_products(vec![product]);
        CatalogService::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn test_find_product_hit() {
        let catalog = seeded();
        let product = catalog.find_product("apples").await.unwrap();
        assert_eq!(product.name, "Apples");
    }

    #[tokio::test]
    async fn test_find_product_miss_is_not_found() {
        let catalog = seeded();
        let err = catalog.find_product("pears").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(err.code(), StoreErrorCode::NotFound);
    }
}
