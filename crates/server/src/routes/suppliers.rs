use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service::store::Database;
use tracing::info;

use crate::dto::{
    parse_id, AddressInput, AddressResponse, CreateSupplierRequest, CreatedResponse, MessageResponse,
    SupplierEnvelope, SupplierResponse, SuppliersResponse,
};
use crate::errors::JsonApiError;
use crate::routes::json_body;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/v1/supplier/create", tag = "supplier",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<CreateSupplierRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    let (supplier, address) = json_body(body)?.validate()?;
    let id = state
        .services
        .suppliers
        .create(&supplier, &address)
        .await
        .map_err(JsonApiError::create_failed)?;
    info!(supplier_id = %id, "supplier created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { message: "supplier created".into(), id })))
}

#[utoipa::path(
    put, path = "/api/v1/supplier/updateAddress/{id}", tag = "supplier",
    params(("id" = String, Path, description = "Supplier ID (UUID)")),
    request_body = AddressInput,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_address<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    body: Result<Json<AddressInput>, JsonRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = parse_id(&id, "supplier")?;
    let address = json_body(body)?.validate()?;
    state.services.suppliers.update_address(id, address).await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(MessageResponse::new("address updated")))
}

#[utoipa::path(
    delete, path = "/api/v1/supplier/delete/{id}", tag = "supplier",
    params(("id" = String, Path, description = "Supplier ID (UUID)")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = parse_id(&id, "supplier")?;
    state.services.suppliers.remove(id).await.map_err(JsonApiError::operation_failed)?;
    info!(supplier_id = %id, "supplier deleted");
    Ok(Json(MessageResponse::new("supplier deleted")))
}

#[utoipa::path(
    get, path = "/api/v1/supplier/supplierList", tag = "supplier",
    responses(
        (status = 200, description = "All suppliers", body = SuppliersResponse),
        (status = 404, description = "Lookup Failed")
    )
)]
pub async fn list<D: Database>(State(state): State<AppState<D>>) -> Result<Json<SuppliersResponse>, JsonApiError> {
    let suppliers = state.services.suppliers.list().await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(SuppliersResponse { suppliers: suppliers.into_iter().map(SupplierResponse::from).collect() }))
}

#[utoipa::path(
    get, path = "/api/v1/supplier/{id}", tag = "supplier",
    params(("id" = String, Path, description = "Supplier ID (UUID)")),
    responses(
        (status = 200, description = "OK", body = SupplierEnvelope),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<SupplierEnvelope>, JsonApiError> {
    let id = parse_id(&id, "supplier")?;
    let supplier = state.services.suppliers.get(id).await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(SupplierEnvelope { supplier: supplier.into() }))
}

#[utoipa::path(
    get, path = "/api/v1/supplier/address/{id}", tag = "supplier",
    params(("id" = String, Path, description = "Supplier ID (UUID)")),
    responses(
        (status = 200, description = "Address of the supplier", body = AddressResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_address<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<AddressResponse>, JsonApiError> {
    let id = parse_id(&id, "supplier")?;
    let address = state.services.suppliers.get_address(id).await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(address.into()))
}
