// streamshop/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod cart_handlers;
pub mod coupon_handlers;
pub mod health_handlers;
pub mod order_handlers;
pub mod payment_handlers;
pub mod product_handlers;
pub mod seed_handlers;
pub mod webhook_handlers;

use crate::errors::AppError;
use uuid::Uuid;

/// Ids that do not parse cannot exist, so they answer 404 like unknown ids.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{} not found", what)))
}
