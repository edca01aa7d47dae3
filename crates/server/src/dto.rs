//! Wire shapes and their validation. Everything that can be a caller's
//! mistake is caught here and reported as 400.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use service::domain::{Address, NewAddress, NewProduct, NewSupplier, NewUser, Product, Supplier, User};

use crate::errors::JsonApiError;

pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| JsonApiError::bad_request(format!("invalid {what} id: {raw}")))
}

/// Rejects blank values; accepted values are kept exactly as sent.
fn required(value: String, field: &str) -> Result<String, JsonApiError> {
    if value.trim().is_empty() {
        return Err(JsonApiError::bad_request(format!("{field} is required")));
    }
    Ok(value)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self { Self { message: message.to_string() } }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressInput {
    pub country: String,
    pub city: String,
    pub street: String,
}

impl AddressInput {
    pub fn validate(self) -> Result<NewAddress, JsonApiError> {
        Ok(NewAddress {
            country: required(self.country, "address.country")?,
            city: required(self.city, "address.city")?,
            street: required(self.street, "address.street")?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub street: String,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self { id: a.id, country: a.country, city: a.city, street: a.street }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub surname: String,
    /// `YYYY-MM-DD`
    pub birthday: String,
    pub gender: String,
    pub address: AddressInput,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<(NewUser, NewAddress), JsonApiError> {
        let birthday = NaiveDate::parse_from_str(self.birthday.trim(), "%Y-%m-%d")
            .map_err(|_| JsonApiError::bad_request(format!("birthday must be YYYY-MM-DD, got {}", self.birthday)))?;
        let user = NewUser {
            name: required(self.name, "name")?,
            surname: required(self.surname, "surname")?,
            birthday,
            gender: required(self.gender, "gender")?,
        };
        Ok((user, self.address.validate()?))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub birthday: String,
    pub gender: String,
    pub registration_date: String,
    /// Id of the owned address.
    pub address: Uuid,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            surname: u.surname,
            birthday: u.birthday.format("%Y-%m-%d").to_string(),
            gender: u.gender,
            registration_date: u.registered_at.to_rfc3339(),
            address: u.address_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPageResponse {
    pub users: Vec<UserResponse>,
    pub has_more: bool,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    pub name: Option<String>,
    pub surname: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Rows per page, default 20. Zero yields an empty page with `has_more` set.
    pub limit: Option<i64>,
    /// Rows to skip, default 0
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSupplierRequest {
    pub name: String,
    pub address: AddressInput,
    pub phone_number: String,
}

impl CreateSupplierRequest {
    pub fn validate(self) -> Result<(NewSupplier, NewAddress), JsonApiError> {
        let supplier = NewSupplier {
            name: required(self.name, "name")?,
            phone_number: required(self.phone_number, "phone_number")?,
        };
        Ok((supplier, self.address.validate()?))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierResponse {
    pub id: Uuid,
    pub name: String,
    /// Id of the owned address.
    pub address: Uuid,
    pub phone_number: String,
}

impl From<Supplier> for SupplierResponse {
    fn from(s: Supplier) -> Self {
        Self { id: s.id, name: s.name, address: s.address_id, phone_number: s.phone_number }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierEnvelope {
    pub supplier: SupplierResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuppliersResponse {
    pub suppliers: Vec<SupplierResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub available_stock: i32,
    #[serde(rename = "supplierID", alias = "supplier_id")]
    pub supplier_id: String,
}

impl CreateProductRequest {
    pub fn validate(self) -> Result<NewProduct, JsonApiError> {
        if self.price.is_sign_negative() {
            return Err(JsonApiError::bad_request("price must not be negative"));
        }
        if self.available_stock < 0 {
            return Err(JsonApiError::bad_request("available_stock must not be negative"));
        }
        Ok(NewProduct {
            supplier_id: parse_id(&self.supplier_id, "supplier")?,
            name: required(self.name, "name")?,
            category: required(self.category, "category")?,
            price: self.price,
            available_stock: self.available_stock,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    pub available_stock: i32,
    #[serde(rename = "lastUpdateDate")]
    pub last_update_date: String,
    #[serde(rename = "supplierID")]
    pub supplier_id: Uuid,
    #[serde(rename = "imageID")]
    pub image_id: Option<Uuid>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            price: p.price,
            available_stock: p.available_stock,
            last_update_date: p.last_update.to_rfc3339(),
            supplier_id: p.supplier_id,
            image_id: p.image_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductEnvelope {
    pub product: ProductResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuantityQuery {
    /// Product id
    pub id: Option<String>,
    /// Units to take out of stock, must be > 0
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadImageRequest {
    pub product_id: String,
    /// Base64-encoded bytes
    pub image: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateImageRequest {
    #[serde(alias = "product_id")]
    pub image_id: String,
    /// Base64-encoded bytes
    pub image: String,
}
