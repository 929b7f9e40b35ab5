// streamshop/src/models/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub platform: String,
  pub price: f64,
  /// Subscription length as shown in the storefront, e.g. "1 mês".
  pub duration: String,
  pub image: String,
  pub features: Vec<String>,
  pub is_available: bool,
}
