use std::num::NonZeroU32;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use service::store::Database;
use tracing::info;

use crate::dto::{
    parse_id, CreateProductRequest, CreatedResponse, MessageResponse, ProductEnvelope, ProductResponse,
    ProductsResponse, QuantityQuery,
};
use crate::errors::JsonApiError;
use crate::routes::{json_body, query_params};
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/v1/product/create", tag = "product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    let product = json_body(body)?.validate()?;
    let id = state.services.products.create(&product).await.map_err(JsonApiError::create_failed)?;
    info!(product_id = %id, supplier_id = %product.supplier_id, "product created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { message: "product created".into(), id })))
}

/// Takes `quantity` units out of stock. Fails without touching the row when
/// fewer units are available.
#[utoipa::path(
    patch, path = "/api/v1/product/updateQuantity", tag = "product",
    params(QuantityQuery),
    responses(
        (status = 200, description = "Stock reduced", body = MessageResponse),
        (status = 400, description = "Invalid id or quantity"),
        (status = 404, description = "Not Found or insufficient stock")
    )
)]
pub async fn reduce_stock<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<QuantityQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let q = query_params(query)?;
    let id = q.id.ok_or_else(|| JsonApiError::bad_request("id is required"))?;
    let id = parse_id(&id, "product")?;
    let quantity = match q.quantity {
        Some(n) if n > 0 => NonZeroU32::new(u32::try_from(n).unwrap_or(u32::MAX)),
        _ => None,
    }
    .ok_or_else(|| JsonApiError::bad_request("quantity must be a positive integer"))?;

    state.services.products.reduce_stock(id, quantity).await.map_err(JsonApiError::operation_failed)?;
    info!(product_id = %id, quantity = quantity.get(), "stock reduced");
    Ok(Json(MessageResponse::new("quantity updated")))
}

#[utoipa::path(
    get, path = "/api/v1/product/{id}", tag = "product",
    params(("id" = String, Path, description = "Product ID (UUID)")),
    responses(
        (status = 200, description = "OK", body = ProductEnvelope),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<ProductEnvelope>, JsonApiError> {
    let id = parse_id(&id, "product")?;
    let product = state.services.products.get(id).await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(ProductEnvelope { product: product.into() }))
}

#[utoipa::path(
    get, path = "/api/v1/product/productList", tag = "product",
    responses(
        (status = 200, description = "All products", body = ProductsResponse),
        (status = 404, description = "Lookup Failed")
    )
)]
pub async fn list<D: Database>(State(state): State<AppState<D>>) -> Result<Json<ProductsResponse>, JsonApiError> {
    let products = state.services.products.list().await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(ProductsResponse { products: products.into_iter().map(ProductResponse::from).collect() }))
}

#[utoipa::path(
    delete, path = "/api/v1/product/delete/{id}", tag = "product",
    params(("id" = String, Path, description = "Product ID (UUID)")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = parse_id(&id, "product")?;
    state.services.products.delete(id).await.map_err(JsonApiError::operation_failed)?;
    info!(product_id = %id, "product deleted");
    Ok(Json(MessageResponse::new("product deleted")))
}
