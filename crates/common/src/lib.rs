//! Shared pieces used by the server crate and the binary.

pub mod types;
pub mod utils;
