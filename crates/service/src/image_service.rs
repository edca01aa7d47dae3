use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::Image;
use crate::errors::{ServiceError, StepContext};
use crate::store::{finish, Database, ImageStore};

/// Product images stored as raw bytes.
pub struct ImageService<D: Database> {
    db: Arc<D>,
}

impl<D: Database> ImageService<D> {
    pub fn new(db: Arc<D>) -> Self { Self { db } }

    /// Store the bytes and make them the image of `product_id`.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn create(&self, product_id: Uuid, data: &[u8]) -> Result<Uuid, ServiceError> {
        let tx = self.db.begin().await.step("begin transaction")?;
        let outcome = async {
            let image_id = tx.store_image(data).await.step("store image")?;
            tx.attach_image(image_id, product_id).await.step("attach image to product")?;
            Ok::<_, ServiceError>(image_id)
        }
        .await;
        let image_id = finish(tx, outcome).await?;
        info!(%image_id, %product_id, "image_created");
        Ok(image_id)
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn update(&self, image_id: Uuid, data: &[u8]) -> Result<(), ServiceError> {
        self.db.conn().replace_image(image_id, data).await.step("replace image")?;
        info!(%image_id, "image_replaced");
        Ok(())
    }

    /// Delete the image and clear it from any product using it. References
    /// are cleared first so the delete never trips the foreign key.
    #[instrument(skip(self))]
    pub async fn delete(&self, image_id: Uuid) -> Result<(), ServiceError> {
        let tx = self.db.begin().await.step("begin transaction")?;
        let outcome = async {
            let cleared = tx.detach_image(image_id).await.step("clear product image reference")?;
            tx.delete_image(image_id).await.step("delete image")?;
            Ok::<_, ServiceError>(cleared)
        }
        .await;
        let cleared = finish(tx, outcome).await?;
        info!(%image_id, products_cleared = cleared, "image_deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_by_product(&self, product_id: Uuid) -> Result<Image, ServiceError> {
        let conn = self.db.conn();
        let image_id = conn.image_id_of_product(product_id).await.step("resolve product image")?;
        conn.get_image(image_id).await.step("fetch image")
    }

    #[instrument(skip(self))]
    pub async fn get(&self, image_id: Uuid) -> Result<Image, ServiceError> {
        self.db.conn().get_image(image_id).await.step("fetch image")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewAddress, NewProduct, NewSupplier};
    use crate::errors::StoreError;
    use crate::store::memory::MemoryDatabase;
    use crate::store::{AddressStore, ProductStore, SupplierStore};
    use rust_decimal::Decimal;

    async fn with_product() -> (Arc<MemoryDatabase>, ImageService<MemoryDatabase>, Uuid) {
        let db = Arc::new(MemoryDatabase::new());
        let conn = db.conn();
        let address_id = conn
            .create_address(&NewAddress { country: "X".into(), city: "Y".into(), street: "Z".into() })
            .await
            .unwrap();
        let supplier_id = conn
            .create_supplier(&NewSupplier { name: "Acme".into(), phone_number: "+1".into() }, address_id)
            .await
            .unwrap();
        let product_id = conn
            .create_product(
                &NewProduct {
                    name: "Lamp".into(),
                    category: "home".into(),
                    price: Decimal::new(2500, 2),
                    available_stock: 2,
                    supplier_id,
                },
                None,
            )
            .await
            .unwrap();
        (Arc::clone(&db), ImageService::new(db), product_id)
    }

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[tokio::test]
    async fn create_links_image_to_product() {
        let (db, svc, product_id) = with_product().await;
        let image_id = svc.create(product_id, PNG).await.unwrap();

        assert_eq!(db.conn().get_product(product_id).await.unwrap().image_id, Some(image_id));
        let by_product = svc.get_by_product(product_id).await.unwrap();
        assert_eq!(by_product, Image { id: image_id, data: PNG.to_vec() });
    }

    #[tokio::test]
    async fn create_for_unknown_product_stores_nothing() {
        let (db, svc, _) = with_product().await;
        let err = svc.create(Uuid::new_v4(), PNG).await.unwrap_err();
        assert_eq!(err.step(), "attach image to product");
        assert_eq!(db.row_counts().images, 0);
    }

    #[tokio::test]
    async fn new_image_replaces_previous_link() {
        let (db, svc, product_id) = with_product().await;
        svc.create(product_id, PNG).await.unwrap();
        let second = svc.create(product_id, b"second").await.unwrap();
        assert_eq!(db.conn().get_product(product_id).await.unwrap().image_id, Some(second));
    }

    #[tokio::test]
    async fn delete_clears_product_reference() {
        let (db, svc, product_id) = with_product().await;
        let image_id = svc.create(product_id, PNG).await.unwrap();

        svc.delete(image_id).await.unwrap();

        assert_eq!(db.conn().get_product(product_id).await.unwrap().image_id, None);
        assert_eq!(db.row_counts().images, 0);
        let err = svc.get_by_product(product_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { source: StoreError::NoImage { .. }, .. }));
    }

    #[tokio::test]
    async fn failed_delete_keeps_reference() {
        let (db, svc, product_id) = with_product().await;
        let image_id = svc.create(product_id, PNG).await.unwrap();

        db.fail_on("delete_image");
        assert!(svc.delete(image_id).await.is_err());
        db.clear_faults();

        assert_eq!(db.conn().get_product(product_id).await.unwrap().image_id, Some(image_id));
        assert_eq!(svc.get(image_id).await.unwrap().data, PNG);
    }

    #[tokio::test]
    async fn delete_unknown_image_is_not_found() {
        let (_db, svc, _) = with_product().await;
        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_overwrites_bytes() {
        let (_db, svc, product_id) = with_product().await;
        let image_id = svc.create(product_id, PNG).await.unwrap();
        svc.update(image_id, b"new bytes").await.unwrap();
        assert_eq!(svc.get(image_id).await.unwrap().data, b"new bytes".to_vec());
        assert!(svc.update(Uuid::new_v4(), b"x").await.is_err());
    }
}
