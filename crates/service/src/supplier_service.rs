use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Address, AddressOwner, NewAddress, NewSupplier, Supplier};
use crate::errors::{ServiceError, StepContext};
use crate::ownership;
use crate::store::{finish, AddressStore, Database, SupplierStore};

/// Supplier lifecycle, same address ownership rules as users.
pub struct SupplierService<D: Database> {
    db: Arc<D>,
}

impl<D: Database> SupplierService<D> {
    pub fn new(db: Arc<D>) -> Self { Self { db } }

    #[instrument(skip(self, supplier, address), fields(name = %supplier.name))]
    pub async fn create(&self, supplier: &NewSupplier, address: &NewAddress) -> Result<Uuid, ServiceError> {
        let tx = self.db.begin().await.step("begin transaction")?;
        let outcome = async {
            let address_id = tx.create_address(address).await.step("create address")?;
            let supplier_id = tx.create_supplier(supplier, address_id).await.step("create supplier")?;
            Ok::<_, ServiceError>((supplier_id, address_id))
        }
        .await;
        let (supplier_id, address_id) = finish(tx, outcome).await?;
        info!(%supplier_id, %address_id, "supplier_created");
        Ok(supplier_id)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        ownership::remove_owner(self.db.as_ref(), AddressOwner::Supplier(id)).await
    }

    #[instrument(skip(self, address))]
    pub async fn update_address(&self, id: Uuid, address: NewAddress) -> Result<(), ServiceError> {
        ownership::update_owned_address(self.db.as_ref(), AddressOwner::Supplier(id), address).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_address(&self, id: Uuid) -> Result<Address, ServiceError> {
        ownership::get_owned_address(self.db.conn(), AddressOwner::Supplier(id)).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Supplier>, ServiceError> {
        self.db.conn().list_suppliers().await.step("list suppliers")
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Supplier, ServiceError> {
        self.db.conn().get_supplier(id).await.step("fetch supplier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewProduct;
    use crate::store::memory::MemoryDatabase;
    use crate::store::ProductStore;
    use rust_decimal::Decimal;

    fn supplier(name: &str) -> NewSupplier {
        NewSupplier { name: name.into(), phone_number: "+7 900 000 00 00".into() }
    }

    fn address() -> NewAddress {
        NewAddress { country: "X".into(), city: "Y".into(), street: "Z".into() }
    }

    fn service() -> (Arc<MemoryDatabase>, SupplierService<MemoryDatabase>) {
        let db = Arc::new(MemoryDatabase::new());
        (Arc::clone(&db), SupplierService::new(db))
    }

    #[tokio::test]
    async fn create_get_and_list() {
        let (_db, svc) = service();
        let a = svc.create(&supplier("Acme"), &address()).await.unwrap();
        let b = svc.create(&supplier("Globex"), &address()).await.unwrap();

        let fetched = svc.get(a).await.unwrap();
        assert_eq!(fetched.name, "Acme");
        assert_eq!(svc.get_address(a).await.unwrap().id, fetched.address_id);

        let all: Vec<Uuid> = svc.list().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(all, vec![a, b]);
    }

    #[tokio::test]
    async fn failed_supplier_insert_leaves_no_address() {
        let (db, svc) = service();
        db.fail_on("create_supplier");
        assert!(svc.create(&supplier("Acme"), &address()).await.is_err());
        assert_eq!(db.row_counts().addresses, 0);
    }

    #[tokio::test]
    async fn remove_deletes_supplier_and_address() {
        let (db, svc) = service();
        let id = svc.create(&supplier("Acme"), &address()).await.unwrap();
        svc.remove(id).await.unwrap();
        assert_eq!(db.row_counts().suppliers, 0);
        assert_eq!(db.row_counts().addresses, 0);
        assert!(matches!(svc.get(id).await.unwrap_err(), ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn supplier_with_products_cannot_be_removed() {
        let (db, svc) = service();
        let id = svc.create(&supplier("Acme"), &address()).await.unwrap();
        db.conn()
            .create_product(
                &NewProduct {
                    name: "Bolt".into(),
                    category: "hardware".into(),
                    price: Decimal::new(150, 2),
                    available_stock: 3,
                    supplier_id: id,
                },
                None,
            )
            .await
            .unwrap();

        let err = svc.remove(id).await.unwrap_err();
        assert_eq!(err.step(), "delete supplier");
        assert_eq!(db.row_counts().suppliers, 1);
        assert_eq!(db.row_counts().addresses, 1);
    }

    #[tokio::test]
    async fn update_address_in_place() {
        let (_db, svc) = service();
        let id = svc.create(&supplier("Acme"), &address()).await.unwrap();
        let before = svc.get_address(id).await.unwrap();
        svc.update_address(id, NewAddress { country: "A".into(), city: "B".into(), street: "C".into() })
            .await
            .unwrap();
        let after = svc.get_address(id).await.unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.street, "C");
    }
}
