//! Create `client` table with FK to `address`.
//!
//! No cascade: the owning address is removed explicitly after the client.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(uuid(Client::Id).primary_key())
                    .col(string_len(Client::ClientName, 128).not_null())
                    .col(string_len(Client::ClientSurname, 128).not_null())
                    .col(date(Client::Birthday).not_null())
                    .col(string_len(Client::Gender, 32).not_null())
                    .col(timestamp_with_time_zone(Client::RegistrationDate).not_null())
                    .col(uuid(Client::AddressId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_address")
                            .from(Client::Table, Client::AddressId)
                            .to(Address::Table, Address::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Client::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Client { Table, Id, ClientName, ClientSurname, Birthday, Gender, RegistrationDate, AddressId }

#[derive(DeriveIden)]
enum Address { Table, Id }
