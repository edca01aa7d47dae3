//! Domain values exchanged between the request layer, services and stores.
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAddress {
    pub country: String,
    pub city: String,
    pub street: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub street: String,
}

impl Address {
    pub fn with_id(id: Uuid, fields: NewAddress) -> Self {
        Self { id, country: fields.country, city: fields.city, street: fields.street }
    }
}

/// Who holds an address. Every address row has exactly one owner, which
/// must be deleted before the address itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressOwner {
    User(Uuid),
    Supplier(Uuid),
}

impl fmt::Display for AddressOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressOwner::User(id) => write!(f, "user {id}"),
            AddressOwner::Supplier(id) => write!(f, "supplier {id}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub birthday: NaiveDate,
    pub gender: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub birthday: NaiveDate,
    pub gender: String,
    pub registered_at: DateTime<Utc>,
    pub address_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub phone_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub address_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub available_stock: i32,
    pub supplier_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub available_stock: i32,
    pub last_update: DateTime<Utc>,
    pub supplier_id: Uuid,
    pub image_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub id: Uuid,
    pub data: Vec<u8>,
}
