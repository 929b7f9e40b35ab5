// streamshop/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub first_name: String,
  pub last_name: String,
  pub phone: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Emails are unique case-insensitively; they are stored trimmed and lowercased.
  pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
  }
}
