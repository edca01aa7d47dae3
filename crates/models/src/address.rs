use sea_orm::{entity::prelude::*, sea_query::Expr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "address")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub street: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, country: &str, city: &str, street: &str) -> Result<Model, DbErr> {
    let am = ActiveModel {
        id: Set(Uuid::now_v7()),
        country: Set(country.to_string()),
        city: Set(city.to_string()),
        street: Set(street.to_string()),
    };
    am.insert(db).await
}

pub async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Overwrite all fields in place. Returns the affected row count.
pub async fn update<C: ConnectionTrait>(db: &C, id: Uuid, country: &str, city: &str, street: &str) -> Result<u64, DbErr> {
    let res = Entity::update_many()
        .col_expr(Column::Country, Expr::value(country))
        .col_expr(Column::City, Expr::value(city))
        .col_expr(Column::Street, Expr::value(street))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}
