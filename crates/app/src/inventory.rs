//! Inventory service.

use tracing::{error, info, warn};

use cafe::{
    documents::{encode_new_product, encode_product_update, encode_stock},
    products::ProductId,
    validation::ProductForm,
};

use crate::{backend::CatalogStore, errors::AppError};

/// Admin writes against the product catalog.
///
/// Forms are validated before any write; a rejected form never reaches the
/// store.
#[derive(Debug, Clone)]
pub struct InventoryService {
    catalog: CatalogStore,
}

impl InventoryService {
    #[must_use]
    pub fn new(catalog: CatalogStore) -> Self {
        Self { catalog }
    }

    /// Create a product from the add form. New products start in stock.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a rejected form and
    /// [`AppError::Write`] when the store fails.
    #[tracing::instrument(name = "inventory.service.create", skip(self, form))]
    pub async fn create(&self, form: &ProductForm) -> Result<ProductId, AppError> {
        let product = form.validate_new().inspect_err(|err| {
            warn!(error = %err, "product form rejected");
        })?;

        let id = self
            .catalog
            .create(encode_new_product(&product))
            .await
            .inspect_err(|err| error!(error = %err, "failed to create product"))?;

        info!(product_id = %id, name = %product.name, "created product");

        Ok(ProductId::from_string(id))
    }

    /// Replace name, category, price and image of a product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a rejected form and
    /// [`AppError::Write`] when the store fails.
    #[tracing::instrument(name = "inventory.service.update", skip(self, form), fields(product_id = %id))]
    pub async fn update(&self, id: &ProductId, form: &ProductForm) -> Result<(), AppError> {
        let update = form.validate_update().inspect_err(|err| {
            warn!(error = %err, "product form rejected");
        })?;

        self.catalog
            .update(id.as_str(), encode_product_update(&update))
            .await
            .inspect_err(|err| error!(error = %err, "failed to update product"))?;

        info!("updated product");

        Ok(())
    }

    /// Flip the stock flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Write`] when the store fails.
    #[tracing::instrument(name = "inventory.service.toggle_stock", skip(self), fields(product_id = %id))]
    pub async fn toggle_stock(&self, id: &ProductId, in_stock: bool) -> Result<bool, AppError> {
        let in_stock = !in_stock;

        self.catalog
            .update(id.as_str(), encode_stock(in_stock))
            .await
            .inspect_err(|err| error!(error = %err, "failed to update stock"))?;

        info!(in_stock, "updated stock");

        Ok(in_stock)
    }

    /// Remove a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Write`] when the store fails.
    #[tracing::instrument(name = "inventory.service.delete", skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), AppError> {
        self.catalog
            .delete(id.as_str())
            .await
            .inspect_err(|err| error!(error = %err, "failed to delete product"))?;

        info!("deleted product");

        Ok(())
    }
}
