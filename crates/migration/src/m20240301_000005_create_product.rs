//! Create `product` table with FKs to `supplier` and (optionally) `images`.
//!
//! Price and stock are guarded by CHECK constraints so a decrement can
//! never drive stock below zero even outside the conditional update.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(string_len(Product::Name, 255).not_null())
                    .col(string_len(Product::Category, 128).not_null())
                    .col(
                        decimal_len(Product::Price, 12, 2)
                            .not_null()
                            .check(Expr::col(Product::Price).gte(0)),
                    )
                    .col(
                        integer(Product::AvailableStock)
                            .not_null()
                            .check(Expr::col(Product::AvailableStock).gte(0)),
                    )
                    .col(timestamp_with_time_zone(Product::LastUpdateDate).not_null())
                    .col(uuid(Product::SupplierId).not_null())
                    .col(uuid_null(Product::ImageId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_supplier")
                            .from(Product::Table, Product::SupplierId)
                            .to(Supplier::Table, Supplier::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_image")
                            .from(Product::Table, Product::ImageId)
                            .to(Images::Table, Images::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, Name, Category, Price, AvailableStock, LastUpdateDate, SupplierId, ImageId }

#[derive(DeriveIden)]
enum Supplier { Table, Id }

#[derive(DeriveIden)]
enum Images { Table, Id }
