//! Service layer: domain values, store capabilities and the orchestration
//! built on top of them.
//! - Stores are small per-entity traits with SeaORM and in-memory backends.
//! - Multi-step operations run inside one transaction.
//! - Errors carry the failing step and keep not-found apart from rejections.

pub mod domain;
pub mod errors;
pub mod pagination;
pub mod store;
mod ownership;

pub mod user_service;
pub mod supplier_service;
pub mod product_service;
pub mod image_service;

#[cfg(test)]
pub mod test_support;

use std::sync::Arc;

use image_service::ImageService;
use product_service::ProductService;
use store::Database;
use supplier_service::SupplierService;
use user_service::UserService;

/// All services wired to one database.
pub struct Services<D: Database> {
    pub users: UserService<D>,
    pub suppliers: SupplierService<D>,
    pub products: ProductService<D::Conn>,
    pub images: ImageService<D>,
}

impl<D: Database> Services<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self {
            users: UserService::new(Arc::clone(&db)),
            suppliers: SupplierService::new(Arc::clone(&db)),
            products: ProductService::new(Arc::new(db.conn().clone())),
            images: ImageService::new(db),
        }
    }
}
