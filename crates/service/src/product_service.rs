use std::num::NonZeroU32;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{NewProduct, Product};
use crate::errors::{ServiceError, StepContext};
use crate::store::ProductStore;

/// Product operations map one-to-one onto the store.
pub struct ProductService<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> ProductService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    #[instrument(skip(self, product), fields(name = %product.name, supplier_id = %product.supplier_id))]
    pub async fn create(&self, product: &NewProduct) -> Result<Uuid, ServiceError> {
        let id = self.store.create_product(product, None).await.step("create product")?;
        info!(product_id = %id, "product_created");
        Ok(id)
    }

    /// Take `quantity` units out of stock, all or nothing.
    #[instrument(skip(self))]
    pub async fn reduce_stock(&self, id: Uuid, quantity: NonZeroU32) -> Result<(), ServiceError> {
        match self.store.reduce_stock(id, quantity).await.step("reduce stock") {
            Ok(()) => {
                info!(product_id = %id, quantity = quantity.get(), "stock_reduced");
                Ok(())
            }
            Err(e) => {
                warn!(product_id = %id, error = %e, "stock_reduction_rejected");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Product, ServiceError> {
        self.store.get_product(id).await.step("fetch product")
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.store.list_products().await.step("list products")
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.store.delete_product(id).await.step("delete product")?;
        info!(product_id = %id, "product_deleted");
        Ok(())
    }
}
