// streamshop/src/models/coupon.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
  pub code: String,
  /// Fraction of the subtotal, e.g. `0.10` for 10%.
  pub discount: f64,
  pub is_active: bool,
}

impl Coupon {
  /// Coupon codes are stored uppercase; lookups go through this.
  pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
  }
}
