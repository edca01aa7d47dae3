//! `client` rows are the persisted form of users.
use chrono::{NaiveDate, Utc};
use sea_orm::{entity::prelude::*, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::address;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_name: String,
    pub client_surname: String,
    pub birthday: Date,
    pub gender: String,
    pub registration_date: DateTimeWithTimeZone,
    pub address_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Address,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Address => Entity::belongs_to(address::Entity).from(Column::AddressId).to(address::Column::Id).into() }
    }
}

impl Related<address::Entity> for Entity {
    fn to() -> RelationDef { Relation::Address.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    surname: &str,
    birthday: NaiveDate,
    gender: &str,
    address_id: Uuid,
) -> Result<Model, DbErr> {
    let am = ActiveModel {
        id: Set(Uuid::now_v7()),
        client_name: Set(name.to_string()),
        client_surname: Set(surname.to_string()),
        birthday: Set(birthday),
        gender: Set(gender.to_string()),
        registration_date: Set(Utc::now().into()),
        address_id: Set(address_id),
    };
    am.insert(db).await
}

pub async fn address_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Uuid>, DbErr> {
    let found = Entity::find_by_id(id)
        .select_only()
        .column(Column::AddressId)
        .into_tuple::<Uuid>()
        .one(db)
        .await?;
    Ok(found)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Exact, case-sensitive match on both name parts, in insertion order.
pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str, surname: &str) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::ClientName.eq(name))
        .filter(Column::ClientSurname.eq(surname))
        .order_by_asc(Column::Id)
        .all(db)
        .await
}

pub async fn list_page<C: ConnectionTrait>(db: &C, limit: u64, offset: u64) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
}
