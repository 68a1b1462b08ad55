//! HTTP surface: inventory search proxy, product publishing, inquiries and
//! the static storefront

mod error;
pub mod models;
mod server;
pub mod services;
pub mod state;
pub(crate) mod utils;

pub use error::ApiError;
pub use server::{build_router, run};
pub use state::{AppState, StateError};
