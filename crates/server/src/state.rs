use std::sync::Arc;

use service::store::Database;
use service::Services;

/// Shared handler state over any store backend.
pub struct AppState<D: Database> {
    pub services: Arc<Services<D>>,
}

impl<D: Database> AppState<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { services: Arc::new(Services::new(db)) }
    }
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self { services: Arc::clone(&self.services) }
    }
}
