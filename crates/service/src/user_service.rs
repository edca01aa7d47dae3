use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Address, AddressOwner, NewAddress, NewUser, User};
use crate::errors::{ServiceError, StepContext};
use crate::ownership;
use crate::pagination::{Page, PageRequest};
use crate::store::{finish, AddressStore, Database, UserStore};

/// User lifecycle: every user owns exactly one address.
pub struct UserService<D: Database> {
    db: Arc<D>,
}

impl<D: Database> UserService<D> {
    pub fn new(db: Arc<D>) -> Self { Self { db } }

    /// Create the address, then the user pointing at it, in one transaction.
    #[instrument(skip(self, user, address), fields(name = %user.name, surname = %user.surname))]
    pub async fn create(&self, user: &NewUser, address: &NewAddress) -> Result<Uuid, ServiceError> {
        let tx = self.db.begin().await.step("begin transaction")?;
        let outcome = async {
            let address_id = tx.create_address(address).await.step("create address")?;
            let user_id = tx.create_user(user, address_id).await.step("create user")?;
            Ok::<_, ServiceError>((user_id, address_id))
        }
        .await;
        let (user_id, address_id) = finish(tx, outcome).await?;
        info!(%user_id, %address_id, "user_created");
        Ok(user_id)
    }

    /// Delete the user and the address it owns.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ServiceError> {
        ownership::remove_owner(self.db.as_ref(), AddressOwner::User(id)).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str, surname: &str) -> Result<Vec<User>, ServiceError> {
        let users = self.db.conn().find_users_by_name(name, surname).await.step("find users")?;
        info!(count = users.len(), "users_found");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Page<User>, ServiceError> {
        let users = self.db.conn().list_users(page).await.step("list users")?;
        Ok(Page::new(users, page))
    }

    #[instrument(skip(self, address))]
    pub async fn update_address(&self, id: Uuid, address: NewAddress) -> Result<(), ServiceError> {
        ownership::update_owned_address(self.db.as_ref(), AddressOwner::User(id), address).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_address(&self, id: Uuid) -> Result<Address, ServiceError> {
        ownership::get_owned_address(self.db.conn(), AddressOwner::User(id)).await
    }
}
