//! RapNet upstream: token issuance and instant-inventory search

mod client;
mod error;
mod models;

pub use client::RapnetClient;
pub use error::RapnetError;
pub(crate) use error::parse_body;
pub use models::{ClientCredentials, IssuedToken, SearchResponse};
