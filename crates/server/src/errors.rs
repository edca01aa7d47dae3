use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{"error": title, "detail": message}`.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    title: &'static str,
    detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(detail.into()))
    }

    /// Failure of a create operation.
    pub fn create_failed(err: ServiceError) -> Self {
        error!(code = err.code(), step = err.step(), error = %err, "create failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(err.to_string()))
    }

    /// Any other service failure. Missing rows, rejected preconditions and
    /// storage faults all surface as 404.
    pub fn operation_failed(err: ServiceError) -> Self {
        let title = match err {
            ServiceError::NotFound { .. } => "Not Found",
            ServiceError::Rejected { .. } => "Rejected",
            ServiceError::Storage { .. } => {
                error!(step = err.step(), error = %err, "storage failure");
                "Operation Failed"
            }
        };
        warn!(code = err.code(), step = err.step(), error = %err, "request failed");
        Self::new(StatusCode::NOT_FOUND, title, Some(err.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode { self.status }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.title, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::errors::{Record, StoreError};
    use uuid::Uuid;

    #[test]
    fn service_failures_map_to_404_except_create() {
        let nf = || ServiceError::at("fetch product", StoreError::not_found(Record::Product, Uuid::new_v4()));
        assert_eq!(JsonApiError::operation_failed(nf()).status(), StatusCode::NOT_FOUND);
        assert_eq!(JsonApiError::create_failed(nf()).status(), StatusCode::INTERNAL_SERVER_ERROR);

        let rejected = ServiceError::at(
            "reduce stock",
            StoreError::InsufficientStock { product_id: Uuid::new_v4(), requested: 2, available: 1 },
        );
        assert_eq!(JsonApiError::operation_failed(rejected).status(), StatusCode::NOT_FOUND);
        assert_eq!(JsonApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
    }
}
