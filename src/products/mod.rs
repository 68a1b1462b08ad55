//! Publishing diamonds to a Shopify store

pub mod client;
pub mod diamond;
pub mod error;
pub mod payload;
pub mod upsert;

pub use client::{CreatedProduct, ProductSummary, ShopifyClient, VariantSummary};
pub use diamond::DiamondRecord;
pub use error::ProductError;
pub use payload::ProductPayload;
pub use upsert::{ProductRef, ProductUpserter, UpsertOutcome};
