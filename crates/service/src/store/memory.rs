//! In-process store used by service and HTTP tests.
//!
//! Mirrors the relational schema closely enough to exercise orchestration:
//! foreign keys reject dangling references and deletes of referenced rows,
//! stock never goes negative, and a transaction works on a private copy of
//! the tables that replaces the shared ones on commit. Only one transaction
//! is open at a time; auto-commit calls wait while it is.
//!
//! Individual operations can be made to fail with [`MemoryDatabase::fail_on`].
use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{AddressStore, Database, ImageStore, ProductStore, SupplierStore, Transaction, UserStore};
use crate::domain::{Address, Image, NewAddress, NewProduct, NewSupplier, NewUser, Product, Supplier, User};
use crate::errors::{Record, StoreError};
use crate::pagination::PageRequest;

#[derive(Clone, Debug, Default)]
struct Tables {
    addresses: BTreeMap<Uuid, Address>,
    users: BTreeMap<Uuid, User>,
    suppliers: BTreeMap<Uuid, Supplier>,
    products: BTreeMap<Uuid, Product>,
    images: BTreeMap<Uuid, Vec<u8>>,
}

/// Row counts per table, for asserting nothing was left behind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub addresses: usize,
    pub users: usize,
    pub suppliers: usize,
    pub products: usize,
    pub images: usize,
}

fn fk_violation(constraint: &str) -> StoreError {
    StoreError::Db(DbErr::Custom(format!("violates foreign key constraint \"{constraint}\"")))
}

impl Tables {
    fn counts(&self) -> RowCounts {
        RowCounts {
            addresses: self.addresses.len(),
            users: self.users.len(),
            suppliers: self.suppliers.len(),
            products: self.products.len(),
            images: self.images.len(),
        }
    }

    fn address_in_use(&self, id: Uuid) -> bool {
        self.users.values().any(|u| u.address_id == id) || self.suppliers.values().any(|s| s.address_id == id)
    }
}

type Faults = Arc<Mutex<HashSet<&'static str>>>;

struct OpenTxn {
    origin: Arc<Mutex<Tables>>,
    _permit: OwnedMutexGuard<()>,
}

/// Store handle. The auto-commit handle writes to the shared tables; a
/// transaction handle writes to its own copy.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    gate: Arc<AsyncMutex<()>>,
    txn: Option<Arc<OpenTxn>>,
    faults: Faults,
}

#[derive(Clone)]
pub struct MemoryDatabase {
    store: MemoryStore,
}

impl Default for MemoryDatabase {
    fn default() -> Self { Self::new() }
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self {
            store: MemoryStore {
                tables: Arc::new(Mutex::new(Tables::default())),
                gate: Arc::new(AsyncMutex::new(())),
                txn: None,
                faults: Arc::new(Mutex::new(HashSet::new())),
            },
        }
    }

    /// Make every later call of the named store operation fail with a
    /// database error, e.g. `fail_on("delete_user")`.
    pub fn fail_on(&self, op: &'static str) {
        self.store.faults.lock().unwrap_or_else(PoisonError::into_inner).insert(op);
    }

    pub fn clear_faults(&self) {
        self.store.faults.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn row_counts(&self) -> RowCounts {
        self.store.tables.lock().unwrap_or_else(PoisonError::into_inner).counts()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Conn = MemoryStore;
    type Tx = MemoryStore;

    fn conn(&self) -> &Self::Conn { &self.store }

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        self.store.check("begin")?;
        let permit = Arc::clone(&self.store.gate).lock_owned().await;
        let snapshot = self.store.tables.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(MemoryStore {
            tables: Arc::new(Mutex::new(snapshot)),
            gate: Arc::clone(&self.store.gate),
            txn: Some(Arc::new(OpenTxn { origin: Arc::clone(&self.store.tables), _permit: permit })),
            faults: Arc::clone(&self.store.faults),
        })
    }
}

#[async_trait]
impl Transaction for MemoryStore {
    /// Publish the staged tables. A no-op on the auto-commit handle.
    async fn commit(self) -> Result<(), StoreError> {
        self.check("commit")?;
        if let Some(txn) = &self.txn {
            let staged = self.tables.lock().unwrap_or_else(PoisonError::into_inner).clone();
            *txn.origin.lock().unwrap_or_else(PoisonError::into_inner) = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl MemoryStore {
    fn check(&self, op: &'static str) -> Result<(), StoreError> {
        if self.faults.lock().unwrap_or_else(PoisonError::into_inner).contains(op) {
            return Err(StoreError::Db(DbErr::Custom(format!("injected failure in {op}"))));
        }
        Ok(())
    }

    async fn apply<R, F>(&self, op: &'static str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Tables) -> Result<R, StoreError> + Send,
    {
        self.check(op)?;
        // Inside a transaction the gate is already held by us.
        let _permit = match self.txn {
            Some(_) => None,
            None => Some(self.gate.lock().await),
        };
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut tables)
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn create_address(&self, a: &NewAddress) -> Result<Uuid, StoreError> {
        self.apply("create_address", |t| {
            let id = Uuid::now_v7();
            t.addresses.insert(id, Address::with_id(id, a.clone()));
            Ok(id)
        })
        .await
    }

    async fn get_address(&self, id: Uuid) -> Result<Address, StoreError> {
        self.apply("get_address", |t| {
            t.addresses.get(&id).cloned().ok_or_else(|| StoreError::not_found(Record::Address, id))
        })
        .await
    }

    async fn update_address(&self, a: &Address) -> Result<(), StoreError> {
        self.apply("update_address", |t| match t.addresses.get_mut(&a.id) {
            Some(row) => {
                *row = a.clone();
                Ok(())
            }
            None => Err(StoreError::not_found(Record::Address, a.id)),
        })
        .await
    }

    async fn delete_address(&self, id: Uuid) -> Result<(), StoreError> {
        self.apply("delete_address", |t| {
            if t.address_in_use(id) {
                return Err(fk_violation("fk_client_address"));
            }
            t.addresses.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(Record::Address, id))
        })
        .await
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, u: &NewUser, address_id: Uuid) -> Result<Uuid, StoreError> {
        self.apply("create_user", |t| {
            if !t.addresses.contains_key(&address_id) {
                return Err(fk_violation("fk_client_address"));
            }
            let id = Uuid::now_v7();
            t.users.insert(id, User {
                id,
                name: u.name.clone(),
                surname: u.surname.clone(),
                birthday: u.birthday,
                gender: u.gender.clone(),
                registered_at: Utc::now(),
                address_id,
            });
            Ok(id)
        })
        .await
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        self.apply("delete_user", |t| {
            t.users.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(Record::User, id))
        })
        .await
    }

    async fn address_id_of_user(&self, id: Uuid) -> Result<Uuid, StoreError> {
        self.apply("address_id_of_user", |t| {
            t.users.get(&id).map(|u| u.address_id).ok_or_else(|| StoreError::not_found(Record::User, id))
        })
        .await
    }

    async fn find_users_by_name(&self, name: &str, surname: &str) -> Result<Vec<User>, StoreError> {
        self.apply("find_users_by_name", |t| {
            Ok(t.users.values().filter(|u| u.name == name && u.surname == surname).cloned().collect())
        })
        .await
    }

    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, StoreError> {
        let skip = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit).unwrap_or(usize::MAX);
        self.apply("list_users", |t| Ok(t.users.values().skip(skip).take(take).cloned().collect()))
            .await
    }
}

#[async_trait]
impl SupplierStore for MemoryStore {
    async fn create_supplier(&self, s: &NewSupplier, address_id: Uuid) -> Result<Uuid, StoreError> {
        self.apply("create_supplier", |t| {
            if !t.addresses.contains_key(&address_id) {
                return Err(fk_violation("fk_supplier_address"));
            }
            let id = Uuid::now_v7();
            t.suppliers.insert(id, Supplier {
                id,
                name: s.name.clone(),
                phone_number: s.phone_number.clone(),
                address_id,
            });
            Ok(id)
        })
        .await
    }

    async fn delete_supplier(&self, id: Uuid) -> Result<(), StoreError> {
        self.apply("delete_supplier", |t| {
            if t.products.values().any(|p| p.supplier_id == id) {
                return Err(fk_violation("fk_product_supplier"));
            }
            t.suppliers.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(Record::Supplier, id))
        })
        .await
    }

    async fn address_id_of_supplier(&self, id: Uuid) -> Result<Uuid, StoreError> {
        self.apply("address_id_of_supplier", |t| {
            t.suppliers.get(&id).map(|s| s.address_id).ok_or_else(|| StoreError::not_found(Record::Supplier, id))
        })
        .await
    }

    async fn get_supplier(&self, id: Uuid) -> Result<Supplier, StoreError> {
        self.apply("get_supplier", |t| {
            t.suppliers.get(&id).cloned().ok_or_else(|| StoreError::not_found(Record::Supplier, id))
        })
        .await
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, StoreError> {
        self.apply("list_suppliers", |t| Ok(t.suppliers.values().cloned().collect())).await
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, p: &NewProduct, image_id: Option<Uuid>) -> Result<Uuid, StoreError> {
        self.apply("create_product", |t| {
            if !t.suppliers.contains_key(&p.supplier_id) {
                return Err(fk_violation("fk_product_supplier"));
            }
            if image_id.is_some_and(|img| !t.images.contains_key(&img)) {
                return Err(fk_violation("fk_product_image"));
            }
            if p.available_stock < 0 || p.price.is_sign_negative() {
                return Err(StoreError::Db(DbErr::Custom("violates check constraint on product".into())));
            }
            let id = Uuid::now_v7();
            t.products.insert(id, Product {
                id,
                name: p.name.clone(),
                category: p.category.clone(),
                price: p.price,
                available_stock: p.available_stock,
                last_update: Utc::now(),
                supplier_id: p.supplier_id,
                image_id,
            });
            Ok(id)
        })
        .await
    }

    async fn reduce_stock(&self, id: Uuid, quantity: NonZeroU32) -> Result<(), StoreError> {
        let requested = quantity.get();
        self.apply("reduce_stock", |t| {
            let p = t.products.get_mut(&id).ok_or_else(|| StoreError::not_found(Record::Product, id))?;
            match i32::try_from(requested) {
                Ok(q) if p.available_stock >= q => {
                    p.available_stock -= q;
                    p.last_update = Utc::now();
                    Ok(())
                }
                _ => Err(StoreError::InsufficientStock { product_id: id, requested, available: p.available_stock }),
            }
        })
        .await
    }

    async fn get_product(&self, id: Uuid) -> Result<Product, StoreError> {
        self.apply("get_product", |t| {
            t.products.get(&id).cloned().ok_or_else(|| StoreError::not_found(Record::Product, id))
        })
        .await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.apply("list_products", |t| Ok(t.products.values().cloned().collect())).await
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError> {
        self.apply("delete_product", |t| {
            t.products.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(Record::Product, id))
        })
        .await
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn store_image(&self, data: &[u8]) -> Result<Uuid, StoreError> {
        self.apply("store_image", |t| {
            let id = Uuid::now_v7();
            t.images.insert(id, data.to_vec());
            Ok(id)
        })
        .await
    }

    async fn attach_image(&self, image_id: Uuid, product_id: Uuid) -> Result<(), StoreError> {
        self.apply("attach_image", |t| {
            if !t.images.contains_key(&image_id) {
                return Err(fk_violation("fk_product_image"));
            }
            let p = t.products.get_mut(&product_id).ok_or_else(|| StoreError::not_found(Record::Product, product_id))?;
            p.image_id = Some(image_id);
            Ok(())
        })
        .await
    }

    async fn replace_image(&self, image_id: Uuid, data: &[u8]) -> Result<(), StoreError> {
        self.apply("replace_image", |t| match t.images.get_mut(&image_id) {
            Some(bytes) => {
                *bytes = data.to_vec();
                Ok(())
            }
            None => Err(StoreError::not_found(Record::Image, image_id)),
        })
        .await
    }

    async fn delete_image(&self, id: Uuid) -> Result<(), StoreError> {
        self.apply("delete_image", |t| {
            if t.products.values().any(|p| p.image_id == Some(id)) {
                return Err(fk_violation("fk_product_image"));
            }
            t.images.remove(&id).map(|_| ()).ok_or_else(|| StoreError::not_found(Record::Image, id))
        })
        .await
    }

    async fn detach_image(&self, image_id: Uuid) -> Result<u64, StoreError> {
        self.apply("detach_image", |t| {
            let mut cleared = 0;
            for p in t.products.values_mut().filter(|p| p.image_id == Some(image_id)) {
                p.image_id = None;
                cleared += 1;
            }
            Ok(cleared)
        })
        .await
    }

    async fn image_id_of_product(&self, product_id: Uuid) -> Result<Uuid, StoreError> {
        self.apply("image_id_of_product", |t| {
            let p = t.products.get(&product_id).ok_or_else(|| StoreError::not_found(Record::Product, product_id))?;
            p.image_id.ok_or(StoreError::NoImage { product_id })
        })
        .await
    }

    async fn get_image(&self, id: Uuid) -> Result<Image, StoreError> {
        self.apply("get_image", |t| {
            t.images
                .get(&id)
                .map(|data| Image { id, data: data.clone() })
                .ok_or_else(|| StoreError::not_found(Record::Image, id))
        })
        .await
    }
}
