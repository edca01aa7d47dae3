pub mod images;
pub mod products;
pub mod suppliers;
pub mod users;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use service::store::Database;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Unwraps a JSON body, turning extractor rejections into the JSON error shape.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    body.map(|Json(v)| v).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, JsonApiError> {
    query.map(|Query(v)| v).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

fn user_routes<D: Database>() -> Router<AppState<D>> {
    Router::new()
        .route("/create", post(users::create::<D>))
        .route("/delete/:id", delete(users::delete::<D>))
        .route("/users", get(users::find_by_name::<D>))
        .route("/usersList", get(users::list::<D>))
        .route("/updateAddress/:id", put(users::update_address::<D>))
        .route("/address/:id", get(users::get_address::<D>))
}

fn supplier_routes<D: Database>() -> Router<AppState<D>> {
    Router::new()
        .route("/create", post(suppliers::create::<D>))
        .route("/updateAddress/:id", put(suppliers::update_address::<D>))
        .route("/delete/:id", delete(suppliers::delete::<D>))
        .route("/supplierList", get(suppliers::list::<D>))
        .route("/address/:id", get(suppliers::get_address::<D>))
        .route("/:id", get(suppliers::get::<D>))
}

fn product_routes<D: Database>() -> Router<AppState<D>> {
    Router::new()
        .route("/create", post(products::create::<D>))
        .route("/updateQuantity", patch(products::reduce_stock::<D>))
        .route("/productList", get(products::list::<D>))
        .route("/delete/:id", delete(products::delete::<D>))
        .route("/:id", get(products::get::<D>))
}

fn image_routes<D: Database>() -> Router<AppState<D>> {
    Router::new()
        .route("/create", post(images::create::<D>))
        .route("/updateImage", put(images::update::<D>))
        .route("/delete/:id", delete(images::delete::<D>))
        .route("/product/:id", get(images::get_by_product::<D>))
        .route("/:id", get(images::get::<D>))
}

/// Build the full application router: health, the versioned API and the docs.
pub fn build_router<D: Database>(state: AppState<D>, cors: CorsLayer) -> Router {
    let api = Router::new()
        .nest("/user", user_routes::<D>())
        .nest("/supplier", supplier_routes::<D>())
        .nest("/product", product_routes::<D>())
        .nest("/image", image_routes::<D>());

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use service::store::memory::MemoryDatabase;
    use tower::ServiceExt;

    use crate::startup::build_app;

    async fn call(method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = build_app(Arc::new(MemoryDatabase::new()));
        let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = call("GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let (status, body) = call("GET", "/api/v1/product/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation Error");
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let uri = format!("/api/v1/product/{}", uuid::Uuid::new_v4());
        let (status, body) = call("GET", &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not Found");
    }

    #[tokio::test]
    async fn zero_limit_returns_empty_page_reporting_more() {
        let (status, body) = call("GET", "/api/v1/user/usersList?limit=0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["users"].as_array().unwrap().is_empty());
        assert_eq!(body["has_more"], true);
        assert_eq!(body["limit"], 0);
    }

    #[tokio::test]
    async fn negative_offset_rejected() {
        let (status, _) = call("GET", "/api/v1/user/usersList?offset=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_positive_quantity_rejected() {
        let uri = format!("/api/v1/product/updateQuantity?id={}&quantity=0", uuid::Uuid::new_v4());
        let (status, _) = call("PATCH", &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn openapi_document_served() {
        let (status, body) = call("GET", "/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/product/updateQuantity"].is_object());
    }
}
