//! Create `address` table.
//!
//! Rows carry no owner column; a client or supplier points at them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(uuid(Address::Id).primary_key())
                    .col(string_len(Address::Country, 128).not_null())
                    .col(string_len(Address::City, 128).not_null())
                    .col(string_len(Address::Street, 255).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Address::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Address { Table, Id, Country, City, Street }
