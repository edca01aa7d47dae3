//! SeaORM-backed stores. `PgStore<C>` works over the pool or an open
//! transaction; `PgDatabase` ties the two together.
use std::num::NonZeroU32;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use models::{address, client, image, product, supplier};

use super::{AddressStore, Database, ImageStore, ProductStore, SupplierStore, Transaction, UserStore};
use crate::domain::{Address, Image, NewAddress, NewProduct, NewSupplier, NewUser, Product, Supplier, User};
use crate::errors::{Record, StoreError};
use crate::pagination::PageRequest;

#[derive(Clone, Debug)]
pub struct PgStore<C>(pub C);

#[derive(Clone, Debug)]
pub struct PgDatabase {
    store: PgStore<DatabaseConnection>,
}

impl PgDatabase {
    pub fn new(db: DatabaseConnection) -> Self { Self { store: PgStore(db) } }

    pub fn connection(&self) -> &DatabaseConnection { &self.store.0 }
}

#[async_trait]
impl Database for PgDatabase {
    type Conn = PgStore<DatabaseConnection>;
    type Tx = PgStore<DatabaseTransaction>;

    fn conn(&self) -> &Self::Conn { &self.store }

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        Ok(PgStore(self.store.0.begin().await?))
    }
}

#[async_trait]
impl Transaction for PgStore<DatabaseTransaction> {
    async fn commit(self) -> Result<(), StoreError> {
        self.0.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.0.rollback().await?;
        Ok(())
    }
}

impl From<address::Model> for Address {
    fn from(m: address::Model) -> Self {
        Self { id: m.id, country: m.country, city: m.city, street: m.street }
    }
}

impl From<client::Model> for User {
    fn from(m: client::Model) -> Self {
        Self {
            id: m.id,
            name: m.client_name,
            surname: m.client_surname,
            birthday: m.birthday,
            gender: m.gender,
            registered_at: m.registration_date.into(),
            address_id: m.address_id,
        }
    }
}

impl From<supplier::Model> for Supplier {
    fn from(m: supplier::Model) -> Self {
        Self { id: m.id, name: m.name, phone_number: m.phone_number, address_id: m.address_id }
    }
}

impl From<product::Model> for Product {
    fn from(m: product::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category: m.category,
            price: m.price,
            available_stock: m.available_stock,
            last_update: m.last_update_date.into(),
            supplier_id: m.supplier_id,
            image_id: m.image_id,
        }
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> AddressStore for PgStore<C> {
    async fn create_address(&self, a: &NewAddress) -> Result<Uuid, StoreError> {
        let created = address::create(&self.0, &a.country, &a.city, &a.street).await?;
        Ok(created.id)
    }

    async fn get_address(&self, id: Uuid) -> Result<Address, StoreError> {
        address::find(&self.0, id)
            .await?
            .map(Address::from)
            .ok_or_else(|| StoreError::not_found(Record::Address, id))
    }

    async fn update_address(&self, a: &Address) -> Result<(), StoreError> {
        let rows = address::update(&self.0, a.id, &a.country, &a.city, &a.street).await?;
        StoreError::expect_rows(rows, Record::Address, a.id)
    }

    async fn delete_address(&self, id: Uuid) -> Result<(), StoreError> {
        let rows = address::delete(&self.0, id).await?;
        StoreError::expect_rows(rows, Record::Address, id)
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> UserStore for PgStore<C> {
    async fn create_user(&self, u: &NewUser, address_id: Uuid) -> Result<Uuid, StoreError> {
        let created = client::create(&self.0, &u.name, &u.surname, u.birthday, &u.gender, address_id).await?;
        Ok(created.id)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let rows = client::delete(&self.0, id).await?;
        StoreError::expect_rows(rows, Record::User, id)
    }

    async fn address_id_of_user(&self, id: Uuid) -> Result<Uuid, StoreError> {
        client::address_id(&self.0, id)
            .await?
            .ok_or_else(|| StoreError::not_found(Record::User, id))
    }

    async fn find_users_by_name(&self, name: &str, surname: &str) -> Result<Vec<User>, StoreError> {
        let rows = client::find_by_name(&self.0, name, surname).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, StoreError> {
        let rows = client::list_page(&self.0, page.limit, page.offset).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> SupplierStore for PgStore<C> {
    async fn create_supplier(&self, s: &NewSupplier, address_id: Uuid) -> Result<Uuid, StoreError> {
        let created = supplier::create(&self.0, &s.name, &s.phone_number, address_id).await?;
        Ok(created.id)
    }

    async fn delete_supplier(&self, id: Uuid) -> Result<(), StoreError> {
        let rows = supplier::delete(&self.0, id).await?;
        StoreError::expect_rows(rows, Record::Supplier, id)
    }

    async fn address_id_of_supplier(&self, id: Uuid) -> Result<Uuid, StoreError> {
        supplier::address_id(&self.0, id)
            .await?
            .ok_or_else(|| StoreError::not_found(Record::Supplier, id))
    }

    async fn get_supplier(&self, id: Uuid) -> Result<Supplier, StoreError> {
        supplier::find(&self.0, id)
            .await?
            .map(Supplier::from)
            .ok_or_else(|| StoreError::not_found(Record::Supplier, id))
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, StoreError> {
        let rows = supplier::list(&self.0).await?;
        Ok(rows.into_iter().map(Supplier::from).collect())
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> ProductStore for PgStore<C> {
    async fn create_product(&self, p: &NewProduct, image_id: Option<Uuid>) -> Result<Uuid, StoreError> {
        let created = product::create(&self.0, product::NewProduct {
            name: &p.name,
            category: &p.category,
            price: p.price,
            available_stock: p.available_stock,
            supplier_id: p.supplier_id,
            image_id,
        })
        .await?;
        Ok(created.id)
    }

    async fn reduce_stock(&self, id: Uuid, quantity: NonZeroU32) -> Result<(), StoreError> {
        let requested = quantity.get();
        // Anything above i32::MAX can never be satisfied by an INTEGER column.
        let rows = match i32::try_from(requested) {
            Ok(q) => product::reduce_stock(&self.0, id, q).await?,
            Err(_) => 0,
        };
        if rows > 0 {
            return Ok(());
        }
        // Nothing updated: read back only to report why.
        match product::find(&self.0, id).await? {
            None => Err(StoreError::not_found(Record::Product, id)),
            Some(p) => Err(StoreError::InsufficientStock { product_id: id, requested, available: p.available_stock }),
        }
    }

    async fn get_product(&self, id: Uuid) -> Result<Product, StoreError> {
        product::find(&self.0, id)
            .await?
            .map(Product::from)
            .ok_or_else(|| StoreError::not_found(Record::Product, id))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = product::list(&self.0).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError> {
        let rows = product::delete(&self.0, id).await?;
        StoreError::expect_rows(rows, Record::Product, id)
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> ImageStore for PgStore<C> {
    async fn store_image(&self, data: &[u8]) -> Result<Uuid, StoreError> {
        Ok(image::create(&self.0, data.to_vec()).await?)
    }

    async fn attach_image(&self, image_id: Uuid, product_id: Uuid) -> Result<(), StoreError> {
        let rows = product::set_image(&self.0, product_id, image_id).await?;
        StoreError::expect_rows(rows, Record::Product, product_id)
    }

    async fn replace_image(&self, image_id: Uuid, data: &[u8]) -> Result<(), StoreError> {
        let rows = image::replace(&self.0, image_id, data.to_vec()).await?;
        StoreError::expect_rows(rows, Record::Image, image_id)
    }

    async fn delete_image(&self, id: Uuid) -> Result<(), StoreError> {
        let rows = image::delete(&self.0, id).await?;
        StoreError::expect_rows(rows, Record::Image, id)
    }

    async fn detach_image(&self, image_id: Uuid) -> Result<u64, StoreError> {
        Ok(product::clear_image(&self.0, image_id).await?)
    }

    async fn image_id_of_product(&self, product_id: Uuid) -> Result<Uuid, StoreError> {
        let p = product::find(&self.0, product_id)
            .await?
            .ok_or_else(|| StoreError::not_found(Record::Product, product_id))?;
        p.image_id.ok_or(StoreError::NoImage { product_id })
    }

    async fn get_image(&self, id: Uuid) -> Result<Image, StoreError> {
        image::find(&self.0, id)
            .await?
            .map(|m| Image { id: m.id, data: m.image })
            .ok_or_else(|| StoreError::not_found(Record::Image, id))
    }
}
