use utoipa::OpenApi;

use crate::dto::{
    AddressInput, AddressResponse, CreateProductRequest, CreateSupplierRequest, CreateUserRequest,
    CreatedResponse, MessageResponse, ProductEnvelope, ProductResponse, ProductsResponse, SupplierEnvelope,
    SupplierResponse, SuppliersResponse, UpdateImageRequest, UploadImageRequest, UserPageResponse, UserResponse,
    UsersResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::create,
        crate::routes::users::delete,
        crate::routes::users::find_by_name,
        crate::routes::users::list,
        crate::routes::users::update_address,
        crate::routes::users::get_address,
        crate::routes::suppliers::create,
        crate::routes::suppliers::update_address,
        crate::routes::suppliers::delete,
        crate::routes::suppliers::list,
        crate::routes::suppliers::get,
        crate::routes::suppliers::get_address,
        crate::routes::products::create,
        crate::routes::products::reduce_stock,
        crate::routes::products::get,
        crate::routes::products::list,
        crate::routes::products::delete,
        crate::routes::images::create,
        crate::routes::images::update,
        crate::routes::images::delete,
        crate::routes::images::get_by_product,
        crate::routes::images::get,
    ),
    components(
        schemas(
            MessageResponse,
            CreatedResponse,
            AddressInput,
            AddressResponse,
            CreateUserRequest,
            UserResponse,
            UsersResponse,
            UserPageResponse,
            CreateSupplierRequest,
            SupplierResponse,
            SupplierEnvelope,
            SuppliersResponse,
            CreateProductRequest,
            ProductResponse,
            ProductEnvelope,
            ProductsResponse,
            UploadImageRequest,
            UpdateImageRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "user"),
        (name = "supplier"),
        (name = "product"),
        (name = "image")
    )
)]
pub struct ApiDoc;
