use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use service::pagination::{PageRequest, DEFAULT_LIMIT};
use service::store::Database;
use tracing::info;

use crate::dto::{
    parse_id, AddressInput, AddressResponse, CreateUserRequest, CreatedResponse, MessageResponse, NameQuery,
    PageQuery, UserPageResponse, UserResponse, UsersResponse,
};
use crate::errors::JsonApiError;
use crate::routes::{json_body, query_params};
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/v1/user/create", tag = "user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    let (user, address) = json_body(body)?.validate()?;
    let id = state.services.users.create(&user, &address).await.map_err(JsonApiError::create_failed)?;
    info!(user_id = %id, "user created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { message: "user created".into(), id })))
}

#[utoipa::path(
    delete, path = "/api/v1/user/delete/{id}", tag = "user",
    params(("id" = String, Path, description = "User ID (UUID)")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Invalid Id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = parse_id(&id, "user")?;
    state.services.users.remove(id).await.map_err(JsonApiError::operation_failed)?;
    info!(user_id = %id, "user deleted");
    Ok(Json(MessageResponse::new("user deleted")))
}

#[utoipa::path(
    get, path = "/api/v1/user/users", tag = "user",
    params(NameQuery),
    responses(
        (status = 200, description = "Matching users", body = UsersResponse),
        (status = 400, description = "Missing name or surname"),
        (status = 404, description = "Lookup Failed")
    )
)]
pub async fn find_by_name<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<Json<UsersResponse>, JsonApiError> {
    let q = query_params(query)?;
    let (Some(name), Some(surname)) = (q.name, q.surname) else {
        return Err(JsonApiError::bad_request("name and surname are required"));
    };
    let users = state
        .services
        .users
        .find_by_name(&name, &surname)
        .await
        .map_err(JsonApiError::operation_failed)?;
    Ok(Json(UsersResponse { users: users.into_iter().map(UserResponse::from).collect() }))
}

#[utoipa::path(
    get, path = "/api/v1/user/usersList", tag = "user",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPageResponse),
        (status = 400, description = "Invalid limit or offset"),
        (status = 404, description = "Lookup Failed")
    )
)]
pub async fn list<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<UserPageResponse>, JsonApiError> {
    let q = query_params(query)?;
    let limit = q.limit.unwrap_or(DEFAULT_LIMIT as i64);
    let offset = q.offset.unwrap_or(0);
    if limit < 0 {
        return Err(JsonApiError::bad_request("limit must not be negative"));
    }
    if offset < 0 {
        return Err(JsonApiError::bad_request("offset must not be negative"));
    }
    let page = state
        .services
        .users
        .list(PageRequest { limit: limit as u64, offset: offset as u64 })
        .await
        .map_err(JsonApiError::operation_failed)?;
    Ok(Json(UserPageResponse {
        has_more: page.has_more,
        limit: page.limit,
        offset: page.offset,
        users: page.items.into_iter().map(UserResponse::from).collect(),
    }))
}

#[utoipa::path(
    put, path = "/api/v1/user/updateAddress/{id}", tag = "user",
    params(("id" = String, Path, description = "User ID (UUID)")),
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
    let id = parse_id(&id, "user")?;
    let address = json_body(body)?.validate()?;
    state.services.users.update_address(id, address).await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(MessageResponse::new("address updated")))
}

#[utoipa::path(
    get, path = "/api/v1/user/address/{id}", tag = "user",
    params(("id" = String, Path, description = "User ID (UUID)")),
    responses(
        (status = 200, description = "Address of the user", body = AddressResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_address<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<AddressResponse>, JsonApiError> {
    let id = parse_id(&id, "user")?;
    let address = state.services.users.get_address(id).await.map_err(JsonApiError::operation_failed)?;
    Ok(Json(address.into()))
}
