// streamshop/src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub product_id: Uuid,
  pub quantity: i32,
}

/// A cart is replaced wholesale on every update, keyed by the browser session.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub session_id: String,
  pub user_id: Option<Uuid>,
  #[sqlx(json)]
  pub items: Vec<CartItem>,
  pub updated_at: DateTime<Utc>,
}
