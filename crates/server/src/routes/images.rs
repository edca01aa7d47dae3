use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use service::domain::Image;
use service::store::Database;
use tracing::info;

use crate::dto::{parse_id, CreatedResponse, MessageResponse, UpdateImageRequest, UploadImageRequest};
use crate::errors::JsonApiError;
use crate::routes::json_body;
use crate::state::AppState;

/// Empty payloads are stored as-is.
fn decode_image(encoded: &str) -> Result<Vec<u8>, JsonApiError> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| JsonApiError::bad_request(format!("image is not valid base64: {e}")))
}

fn attachment(image: Image) -> Response {
    let disposition = format!("attachment; filename=\"{}.png\"", image.id);
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        image.data,
    )
        .into_response()
}

#[utoipa::path(
    post, path = "/api/v1/image/create", tag = "image",
    request_body = UploadImageRequest,
    responses(
        (status = 201, description = "Stored and attached to the product", body = CreatedResponse),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<UploadImageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    let req = json_body(body)?;
    let product_id = parse_id(&req.product_id, "product")?;
    let data = decode_image(&req.image)?;
    let id = state.services.images.create(product_id, &data).await.map_err(JsonApiError::create_failed)?;
    info!(image_id = %id, product_id = %product_id, bytes = data.len(), "image stored");
    Ok((StatusCode::CREATED, Json(CreatedResponse { message: "image created".into(), id })))
}

#[utoipa::path(
    put, path = "/api/v1/image/updateImage", tag = "image",
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Replaced", body = MessageResponse),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<UpdateImageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let req = json_body(body)?;
    let image_id = parse_id(&req.image_id, "image")?;
    let data = decode_image(&req.image)?;
    state.services.images.update(image_id, &data).await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(MessageResponse::new("image updated")))
}

#[utoipa::path(
    delete, path = "/api/v1/image/delete/{id}", tag = "image",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = parse_id(&id, "image")?;
    state.services.images.delete(id).await.map_err(JsonApiError::operation_failed)?;
    info!(image_id = %id, "image deleted");
    Ok(Json(MessageResponse::new("image deleted")))
}

#[utoipa::path(
    get, path = "/api/v1/image/product/{id}", tag = "image",
    params(("id" = String, Path, description = "Product ID (UUID)")),
    responses(
        (status = 200, description = "Image bytes as application/octet-stream attachment"),
        (status = 404, description = "Not Found or product has no image")
    )
)]
pub async fn get_by_product<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Response, JsonApiError> {
    let id = parse_id(&id, "product")?;
    let image = state.services.images.get_by_product(id).await.map_err(JsonApiError::operation_failed)?;
    Ok(attachment(image))
}

#[utoipa::path(
    get, path = "/api/v1/image/{id}", tag = "image",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "Image bytes as application/octet-stream attachment"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Response, JsonApiError> {
    let id = parse_id(&id, "image")?;
    let image = state.services.images.get(id).await.map_err(JsonApiError::operation_failed)?;
    Ok(attachment(image))
}
