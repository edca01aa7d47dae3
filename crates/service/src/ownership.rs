//! Orchestration shared by the two address owners (users and suppliers).
//!
//! An owner row references its address; the address has no back-reference.
//! So the owner is always resolved first and deleted before its address.
use tracing::info;
use uuid::Uuid;

use crate::domain::{Address, AddressOwner, NewAddress};
use crate::errors::{ServiceError, StepContext};
use crate::store::{finish, AddressStore, Database, StoreSet, SupplierStore, UserStore};

pub(crate) async fn owned_address_id<S: StoreSet>(store: &S, owner: AddressOwner) -> Result<Uuid, ServiceError> {
    match owner {
        AddressOwner::User(id) => store.address_id_of_user(id).await.step("resolve user address"),
        AddressOwner::Supplier(id) => store.address_id_of_supplier(id).await.step("resolve supplier address"),
    }
}

pub(crate) async fn get_owned_address<S: StoreSet>(store: &S, owner: AddressOwner) -> Result<Address, ServiceError> {
    let address_id = owned_address_id(store, owner).await?;
    store.get_address(address_id).await.step("fetch address")
}

/// Overwrite the owner's address in place; its id does not change.
pub(crate) async fn update_owned_address<D: Database>(
    db: &D,
    owner: AddressOwner,
    fields: NewAddress,
) -> Result<Uuid, ServiceError> {
    let tx = db.begin().await.step("begin transaction")?;
    let outcome = async {
        let address_id = owned_address_id(&tx, owner).await?;
        tx.update_address(&Address::with_id(address_id, fields)).await.step("update address")?;
        Ok::<_, ServiceError>(address_id)
    }
    .await;
    let address_id = finish(tx, outcome).await?;
    info!(%owner, %address_id, "address_updated");
    Ok(address_id)
}

/// Delete the owner row, then the address it owned, as one unit.
pub(crate) async fn remove_owner<D: Database>(db: &D, owner: AddressOwner) -> Result<(), ServiceError> {
    let tx = db.begin().await.step("begin transaction")?;
    let outcome = async {
        let address_id = owned_address_id(&tx, owner).await?;
        match owner {
            AddressOwner::User(id) => tx.delete_user(id).await.step("delete user")?,
            AddressOwner::Supplier(id) => tx.delete_supplier(id).await.step("delete supplier")?,
        }
        tx.delete_address(address_id).await.step("delete address")?;
        Ok::<_, ServiceError>(address_id)
    }
    .await;
    let address_id = finish(tx, outcome).await?;
    info!(%owner, %address_id, "owner_removed");
    Ok(())
}
