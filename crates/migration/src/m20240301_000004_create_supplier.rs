//! Create `supplier` table with FK to `address`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Supplier::Table)
                    .if_not_exists()
                    .col(uuid(Supplier::Id).primary_key())
                    .col(string_len(Supplier::Name, 128).not_null())
                    .col(uuid(Supplier::AddressId).not_null())
                    .col(string_len(Supplier::PhoneNumber, 32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_supplier_address")
                            .from(Supplier::Table, Supplier::AddressId)
                            .to(Address::Table, Address::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Supplier::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Supplier { Table, Id, Name, AddressId, PhoneNumber }

#[derive(DeriveIden)]
enum Address { Table, Id }
