use std::fmt;

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Persisted record kinds, used to say what was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Address,
    User,
    Supplier,
    Product,
    Image,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Record::Address => "address",
            Record::User => "user",
            Record::Supplier => "supplier",
            Record::Product => "product",
            Record::Image => "image",
        };
        f.write_str(name)
    }
}

/// Errors reported by store implementations. Absent rows and rejected
/// preconditions stay distinct here; services decide how much to collapse.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{record} {id} not found")]
    NotFound { record: Record, id: Uuid },
    #[error("product {product_id} has no image")]
    NoImage { product_id: Uuid },
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock { product_id: Uuid, requested: u32, available: i32 },
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl StoreError {
    pub fn not_found(record: Record, id: Uuid) -> Self { Self::NotFound { record, id } }

    /// Turn a zero affected-row count into `NotFound`.
    pub fn expect_rows(rows: u64, record: Record, id: Uuid) -> Result<(), Self> {
        if rows == 0 { Err(Self::not_found(record, id)) } else { Ok(()) }
    }
}

/// Service failure with the orchestration step it happened in.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced row does not exist.
    #[error("{step}: {source}")]
    NotFound { step: &'static str, source: StoreError },
    /// A precondition was not met (e.g. not enough stock).
    #[error("{step}: {source}")]
    Rejected { step: &'static str, source: StoreError },
    /// The database rejected or failed a statement.
    #[error("{step}: {source}")]
    Storage { step: &'static str, source: StoreError },
}

impl ServiceError {
    pub fn at(step: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound { .. } | StoreError::NoImage { .. } => Self::NotFound { step, source },
            StoreError::InsufficientStock { .. } => Self::Rejected { step, source },
            StoreError::Db(_) => Self::Storage { step, source },
        }
    }

    pub fn step(&self) -> &'static str {
        match self {
            Self::NotFound { step, .. } | Self::Rejected { step, .. } | Self::Storage { step, .. } => step,
        }
    }

    #[cfg(test)]
    pub(crate) fn store_error(&self) -> &StoreError {
        match self {
            Self::NotFound { source, .. } | Self::Rejected { source, .. } | Self::Storage { source, .. } => source,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 2001,
            Self::Rejected { .. } => 2002,
            Self::Storage { .. } => 2100,
        }
    }
}

/// Attach the failing step to a store result.
pub trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T, ServiceError>;
}

impl<T> StepContext<T> for Result<T, StoreError> {
    fn step(self, step: &'static str) -> Result<T, ServiceError> {
        self.map_err(|e| ServiceError::at(step, e))
    }
}
