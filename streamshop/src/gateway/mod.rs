// streamshop/src/gateway/mod.rs

//! Payment gateway port plus the wire types of the Mercado Pago payments API.

pub mod mercadopago;

use crate::errors::AppError;
use crate::models::Identification;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use mercadopago::MercadoPagoGateway;

#[derive(Debug, Error)]
pub enum GatewayError {
  /// Non-success HTTP answer; `message` is the gateway's own explanation.
  #[error("gateway rejected the request ({status}): {message}")]
  Rejected { status: u16, message: String },

  #[error("payment not found")]
  NotFound,

  #[error("gateway transport failure: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("invalid gateway base URL: {0}")]
  InvalidBaseUrl(String),
}

impl From<GatewayError> for AppError {
  fn from(err: GatewayError) -> Self {
    match err {
      GatewayError::Rejected { message, .. } => AppError::Gateway(format!("MP Error: {}", message)),
      GatewayError::NotFound => AppError::NotFound("Payment not found".to_string()),
      GatewayError::Transport(e) => AppError::Http(e),
      GatewayError::InvalidBaseUrl(url) => AppError::Config(format!("invalid MERCADOPAGO_API_URL: {url}")),
    }
  }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Creates a payment. `idempotency_key` is forwarded so a retried request
  /// cannot charge twice.
  async fn create_payment(
    &self,
    request: &PaymentRequestBody,
    idempotency_key: &str,
  ) -> Result<GatewayPayment, GatewayError>;

  async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError>;
}

// --- Outbound ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequestBody {
  pub transaction_amount: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub token: Option<String>,
  pub description: String,
  pub payment_method_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub installments: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub issuer_id: Option<String>,
  pub payer: Payer,
  pub external_reference: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub statement_descriptor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payer {
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub identification: Option<Identification>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<PayerPhone>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address: Option<PayerAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayerPhone {
  pub area_code: String,
  pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayerAddress {
  pub street_name: String,
  pub street_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub federal_unit: Option<String>,
  pub zip_code: String,
}

// --- Inbound ---

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GatewayPayment {
  #[serde(deserialize_with = "flexible_id")]
  pub id: String,
  pub status: Option<String>,
  pub status_detail: Option<String>,
  pub payment_method_id: Option<String>,
  pub external_reference: Option<String>,
  pub date_of_expiration: Option<String>,
  pub point_of_interaction: Option<PointOfInteraction>,
  pub transaction_details: Option<TransactionDetails>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PointOfInteraction {
  pub transaction_data: Option<TransactionData>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransactionData {
  pub qr_code: Option<String>,
  pub qr_code_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransactionDetails {
  pub external_resource_url: Option<String>,
  pub digitable_line: Option<String>,
}

/// The gateway sends ids as JSON numbers, webhooks sometimes as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
  Number(u64),
  Text(String),
}

impl From<RawId> for String {
  fn from(raw: RawId) -> Self {
    match raw {
      RawId::Number(n) => n.to_string(),
      RawId::Text(s) => s,
    }
  }
}

pub fn flexible_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  RawId::deserialize(deserializer).map(String::from)
}

pub fn flexible_id_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn payment_id_accepts_numbers_and_strings() {
    let numeric: GatewayPayment = serde_json::from_value(json!({"id": 1234567, "status": "approved"})).unwrap();
    assert_eq!(numeric.id, "1234567");
    let textual: GatewayPayment = serde_json::from_value(json!({"id": "987"})).unwrap();
    assert_eq!(textual.id, "987");
    assert_eq!(textual.status, None);
  }

  #[test]
  fn pix_artifacts_are_read_from_point_of_interaction() {
    let payment: GatewayPayment = serde_json::from_value(json!({
      "id": 1,
      "status": "pending",
      "date_of_expiration": "2024-01-02T00:00:00.000-03:00",
      "point_of_interaction": {"transaction_data": {"qr_code": "000201...", "qr_code_base64": "iVBORw0"}}
    }))
    .unwrap();
    let data = payment.point_of_interaction.unwrap().transaction_data.unwrap();
    assert_eq!(data.qr_code.as_deref(), Some("000201..."));
    assert_eq!(data.qr_code_base64.as_deref(), Some("iVBORw0"));
  }

  #[test]
  fn rejection_maps_to_bad_request_with_gateway_message() {
    let err: AppError = GatewayError::Rejected {
      status: 400,
      message: "invalid card token".into(),
    }
    .into();
    assert!(matches!(err, AppError::Gateway(ref m) if m == "MP Error: invalid card token"));
  }
}
