use sea_orm::{entity::prelude::*, sea_query::Expr, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub image: Vec<u8>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, bytes: Vec<u8>) -> Result<Uuid, DbErr> {
    let id = Uuid::now_v7();
    let am = ActiveModel { id: Set(id), image: Set(bytes) };
    Entity::insert(am).exec_without_returning(db).await?;
    Ok(id)
}

pub async fn replace<C: ConnectionTrait>(db: &C, id: Uuid, bytes: Vec<u8>) -> Result<u64, DbErr> {
    let res = Entity::update_many()
        .col_expr(Column::Image, Expr::value(bytes))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected)
}
