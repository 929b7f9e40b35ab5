// streamshop/src/services/tokens.rs

//! HS256 session tokens carrying the user id.

use crate::errors::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub user_id: Uuid,
  pub exp: i64,
}

pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, AppError> {
  let claims = Claims {
    user_id,
    exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
  };
  sign(&claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Signing failures are server faults, unlike rejected tokens.
fn sign(claims: &Claims, key: &EncodingKey) -> Result<String, AppError> {
  encode(&Header::new(Algorithm::HS256), claims, key)
    .map_err(|e| AppError::Internal(format!("failed to sign session token: {e}")))
}

/// Verifies signature and expiry, returning the user id.
pub fn verify_token(token: &str, secret: &str) -> Result<Uuid, AppError> {
  let data = decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::new(Algorithm::HS256),
  )?;
  Ok(data.claims.user_id)
}
