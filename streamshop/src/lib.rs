// streamshop/src/lib.rs

//! StreamShop: storefront API for streaming-service subscriptions, with
//! Mercado Pago checkout and webhook-driven order reconciliation.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod pipelines;
pub mod reconciler;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::{AppState, Services};
