//! Store capabilities, one trait per entity, plus the transaction seam.
//!
//! Both handles a [`Database`] hands out (the auto-commit connection and an
//! open transaction) implement every store trait, so orchestration code is
//! written once and runs against either.

use std::num::NonZeroU32;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Address, Image, NewAddress, NewProduct, NewSupplier, NewUser, Product, Supplier, User};
use crate::errors::{ServiceError, StepContext, StoreError};
use crate::pagination::PageRequest;

pub mod memory;
pub mod seaorm;

#[async_trait]
pub trait AddressStore: Send + Sync {
    async fn create_address(&self, address: &NewAddress) -> Result<Uuid, StoreError>;
    async fn get_address(&self, id: Uuid) -> Result<Address, StoreError>;
    /// Overwrite the row identified by `address.id`.
    async fn update_address(&self, address: &Address) -> Result<(), StoreError>;
    async fn delete_address(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &NewUser, address_id: Uuid) -> Result<Uuid, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;
    async fn address_id_of_user(&self, id: Uuid) -> Result<Uuid, StoreError>;
    /// Exact, case-sensitive match on both parts, oldest first.
    async fn find_users_by_name(&self, name: &str, surname: &str) -> Result<Vec<User>, StoreError>;
    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait SupplierStore: Send + Sync {
    async fn create_supplier(&self, supplier: &NewSupplier, address_id: Uuid) -> Result<Uuid, StoreError>;
    async fn delete_supplier(&self, id: Uuid) -> Result<(), StoreError>;
    async fn address_id_of_supplier(&self, id: Uuid) -> Result<Uuid, StoreError>;
    async fn get_supplier(&self, id: Uuid) -> Result<Supplier, StoreError>;
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, product: &NewProduct, image_id: Option<Uuid>) -> Result<Uuid, StoreError>;
    /// Decrement stock by `quantity` in one conditional statement. Either the
    /// whole quantity is taken or nothing changes.
    async fn reduce_stock(&self, id: Uuid, quantity: NonZeroU32) -> Result<(), StoreError>;
    async fn get_product(&self, id: Uuid) -> Result<Product, StoreError>;
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store_image(&self, data: &[u8]) -> Result<Uuid, StoreError>;
    /// Point `product_id` at `image_id`, replacing any previous image.
    async fn attach_image(&self, image_id: Uuid, product_id: Uuid) -> Result<(), StoreError>;
    async fn replace_image(&self, image_id: Uuid, data: &[u8]) -> Result<(), StoreError>;
    async fn delete_image(&self, id: Uuid) -> Result<(), StoreError>;
    /// Null the image reference on any product using `image_id`.
    /// Returns how many products were touched; zero is not an error.
    async fn detach_image(&self, image_id: Uuid) -> Result<u64, StoreError>;
    async fn image_id_of_product(&self, product_id: Uuid) -> Result<Uuid, StoreError>;
    async fn get_image(&self, id: Uuid) -> Result<Image, StoreError>;
}

/// Every store capability at once.
pub trait StoreSet: AddressStore + UserStore + SupplierStore + ProductStore + ImageStore {}

impl<T> StoreSet for T where T: AddressStore + UserStore + SupplierStore + ProductStore + ImageStore {}

#[async_trait]
pub trait Transaction: StoreSet + Sized {
    async fn commit(self) -> Result<(), StoreError>;
    async fn rollback(self) -> Result<(), StoreError>;
}

/// Hands out the auto-commit handle and opens transactions.
#[async_trait]
pub trait Database: Send + Sync + 'static {
    type Conn: StoreSet + Clone + 'static;
    type Tx: Transaction + 'static;

    fn conn(&self) -> &Self::Conn;
    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// Commit on success, roll back on failure. The original failure is what
/// the caller sees; a failed rollback is only logged.
pub(crate) async fn finish<T: Transaction, R>(tx: T, outcome: Result<R, ServiceError>) -> Result<R, ServiceError> {
    match outcome {
        Ok(value) => {
            tx.commit().await.step("commit transaction")?;
            Ok(value)
        }
        Err(err) => {
            match tx.rollback().await {
                Ok(()) => warn!(step = err.step(), error = %err, "transaction rolled back"),
                Err(rb) => warn!(step = err.step(), error = %err, rollback_error = %rb, "rollback failed"),
            }
            Err(err)
        }
    }
}
