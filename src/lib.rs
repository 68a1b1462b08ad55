pub mod api;
pub mod auth;
pub mod config;
pub mod humanize;
pub mod inquiry;
pub mod numeric;
pub mod observability;
pub mod products;
pub mod rapnet;
pub mod search;
