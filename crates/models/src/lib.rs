//! SeaORM entities for the warehouse schema plus thin query helpers.
//!
//! Query helpers are generic over `ConnectionTrait` so the same call runs
//! against the pool or inside an open transaction.

pub mod db;
pub mod address;
pub mod client;
pub mod supplier;
pub mod product;
pub mod image;

#[cfg(test)]
mod tests;
