use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Client: lookup by (name, surname)
        manager
            .create_index(
                Index::create()
                    .name("idx_client_name_surname")
                    .table(Client::Table)
                    .col(Client::ClientName)
                    .col(Client::ClientSurname)
                    .to_owned(),
            )
            .await?;

        // Product: FK columns, so supplier/image checks don't scan
        manager
            .create_index(
                Index::create()
                    .name("idx_product_supplier")
                    .table(Product::Table)
                    .col(Product::SupplierId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_product_image")
                    .table(Product::Table)
                    .col(Product::ImageId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_client_name_surname").table(Client::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_supplier").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_image").table(Product::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Client { Table, ClientName, ClientSurname }

#[derive(DeriveIden)]
enum Product { Table, SupplierId, ImageId }
