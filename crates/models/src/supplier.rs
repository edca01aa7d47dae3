use sea_orm::{entity::prelude::*, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::address;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address_id: Uuid,
    pub phone_number: String,
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

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, phone_number: &str, address_id: Uuid) -> Result<Model, DbErr> {
    let am = ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name.to_string()),
        address_id: Set(address_id),
        phone_number: Set(phone_number.to_string()),
    };
    am.insert(db).await
}

pub async fn address_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Uuid>, DbErr> {
    Entity::find_by_id(id)
        .select_only()
        .column(Column::AddressId)
        .into_tuple::<Uuid>()
        .one(db)
        .await
}

pub async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    Entity::find().order_by_asc(Column::Id).all(db).await
}
