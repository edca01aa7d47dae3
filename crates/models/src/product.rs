use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, sea_query::Expr, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{image, supplier};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub available_stock: i32,
    pub last_update_date: DateTimeWithTimeZone,
    pub supplier_id: Uuid,
    pub image_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Supplier,
    Image,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Supplier => Entity::belongs_to(supplier::Entity).from(Column::SupplierId).to(supplier::Column::Id).into(),
            Relation::Image => Entity::belongs_to(image::Entity).from(Column::ImageId).to(image::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub struct NewProduct<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub price: Decimal,
    pub available_stock: i32,
    pub supplier_id: Uuid,
    pub image_id: Option<Uuid>,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewProduct<'_>) -> Result<Model, DbErr> {
    let am = ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(input.name.to_string()),
        category: Set(input.category.to_string()),
        price: Set(input.price),
        available_stock: Set(input.available_stock),
        last_update_date: Set(Utc::now().into()),
        supplier_id: Set(input.supplier_id),
        image_id: Set(input.image_id),
    };
    am.insert(db).await
}

/// Decrement stock by `quantity` only if enough is available, refreshing
/// `last_update_date` in the same statement. Returns the affected row count:
/// zero means the id is unknown or the stock is insufficient.
pub async fn reduce_stock<C: ConnectionTrait>(db: &C, id: Uuid, quantity: i32) -> Result<u64, DbErr> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::AvailableStock, Expr::col(Column::AvailableStock).sub(quantity))
        .col_expr(Column::LastUpdateDate, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::AvailableStock.gte(quantity))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    Entity::find().order_by_asc(Column::Id).all(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}

/// Point the product at `image_id`, replacing any previous image.
pub async fn set_image<C: ConnectionTrait>(db: &C, id: Uuid, image_id: Uuid) -> Result<u64, DbErr> {
    let res = Entity::update_many()
        .col_expr(Column::ImageId, Expr::value(Some(image_id)))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Null out `image_id` on every product referencing the image.
pub async fn clear_image<C: ConnectionTrait>(db: &C, image_id: Uuid) -> Result<u64, DbErr> {
    let res = Entity::update_many()
        .col_expr(Column::ImageId, Expr::value(Option::<Uuid>::None))
        .filter(Column::ImageId.eq(image_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
