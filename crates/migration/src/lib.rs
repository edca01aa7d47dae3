//! Migrator registering entity-specific migrations in dependency order.
//! Address and images come first since the other tables reference them.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_address;
mod m20240301_000002_create_images;
mod m20240301_000003_create_client;
mod m20240301_000004_create_supplier;
mod m20240301_000005_create_product;
mod m20240301_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_address::Migration),
            Box::new(m20240301_000002_create_images::Migration),
            Box::new(m20240301_000003_create_client::Migration),
            Box::new(m20240301_000004_create_supplier::Migration),
            Box::new(m20240301_000005_create_product::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000006_add_indexes::Migration),
        ]
    }
}
