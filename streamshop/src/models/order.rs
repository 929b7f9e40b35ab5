// streamshop/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Internal order status. Always derived from the gateway's raw status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Approved,
  Pending,
  Failed,
}

impl OrderStatus {
  /// `approved` maps to `Approved`; `pending` and `in_process` map to `Pending`;
  /// anything else, including no status at all, is `Failed`.
  pub fn from_gateway_status(status: Option<&str>) -> Self {
    match status {
      Some("approved") => OrderStatus::Approved,
      Some("pending") | Some("in_process") => OrderStatus::Pending,
      _ => OrderStatus::Failed,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Approved => "approved",
      OrderStatus::Pending => "pending",
      OrderStatus::Failed => "failed",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  #[default]
  CreditCard,
  Pix,
  Boleto,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::CreditCard => "credit_card",
      PaymentMethod::Pix => "pix",
      PaymentMethod::Boleto => "boleto",
    }
  }

  /// PIX and boleto payments need the payer's tax id.
  pub fn requires_document(&self) -> bool {
    matches!(self, PaymentMethod::Pix | PaymentMethod::Boleto)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub product_id: String,
  pub name: String,
  pub price: f64,
  pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
  #[serde(rename = "type", default = "default_document_type")]
  pub kind: String,
  pub number: String,
}

fn default_document_type() -> String {
  "CPF".to_string()
}

/// Snapshot of the buyer taken at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub phone: String,
  pub address: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
  #[serde(default = "default_document_type_opt")]
  pub document_type: Option<String>,
  #[serde(default)]
  pub document_number: Option<String>,
  #[serde(default)]
  pub identification: Option<Identification>,
}

fn default_document_type_opt() -> Option<String> {
  Some(default_document_type())
}

impl CustomerInfo {
  /// The payer's tax id as the gateway expects it: the explicit identification
  /// when present, else the loose document fields.
  pub fn tax_identification(&self) -> Option<Identification> {
    if let Some(identification) = &self.identification {
      return Some(identification.clone());
    }
    self
      .document_number
      .as_ref()
      .filter(|number| !number.trim().is_empty())
      .map(|number| Identification {
        kind: self.document_type.clone().unwrap_or_else(default_document_type),
        number: number.clone(),
      })
  }

  pub fn has_document(&self) -> bool {
    self
      .tax_identification()
      .is_some_and(|identification| !identification.number.trim().is_empty())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixData {
  pub qr_code: String,
  pub qr_code_base64: String,
  pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoletoData {
  pub boleto_url: String,
  pub barcode: String,
  pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Option<Uuid>,
  pub session_id: String,
  #[sqlx(json)]
  pub items: Vec<OrderItem>,
  pub subtotal: f64,
  pub discount: f64,
  pub total: f64,
  pub coupon_code: Option<String>,
  #[sqlx(json)]
  pub customer: CustomerInfo,
  pub payment_method: PaymentMethod,
  #[serde(rename = "mercadopagoPaymentId")]
  pub gateway_payment_id: String,
  #[serde(rename = "mercadopagoStatus")]
  pub gateway_status: Option<String>,
  pub status: OrderStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pix_qr_code: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pix_qr_code_base64: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub boleto_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub boleto_barcode: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  /// PIX artifacts stored with the order. The expiry is not persisted.
  pub fn pix(&self) -> Option<PixData> {
    if self.payment_method != PaymentMethod::Pix {
      return None;
    }
    self.pix_qr_code.as_ref().map(|qr_code| PixData {
      qr_code: qr_code.clone(),
      qr_code_base64: self.pix_qr_code_base64.clone().unwrap_or_default(),
      expiration_date: None,
    })
  }

  pub fn boleto(&self) -> Option<BoletoData> {
    if self.payment_method != PaymentMethod::Boleto {
      return None;
    }
    self.boleto_url.as_ref().map(|url| BoletoData {
      boleto_url: url.clone(),
      barcode: self.boleto_barcode.clone().unwrap_or_default(),
      expiration_date: None,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gateway_status_mapping() {
    assert_eq!(OrderStatus::from_gateway_status(Some("approved")), OrderStatus::Approved);
    assert_eq!(OrderStatus::from_gateway_status(Some("pending")), OrderStatus::Pending);
    assert_eq!(OrderStatus::from_gateway_status(Some("in_process")), OrderStatus::Pending);
    assert_eq!(OrderStatus::from_gateway_status(Some("rejected")), OrderStatus::Failed);
    assert_eq!(OrderStatus::from_gateway_status(Some("cancelled")), OrderStatus::Failed);
    assert_eq!(OrderStatus::from_gateway_status(Some("")), OrderStatus::Failed);
    assert_eq!(OrderStatus::from_gateway_status(None), OrderStatus::Failed);
  }

  fn customer() -> CustomerInfo {
    serde_json::from_value(serde_json::json!({
      "email": "ana@example.com",
      "firstName": "Ana",
      "lastName": "Souza",
      "phone": "11999990000",
      "address": "Rua A",
      "city": "São Paulo",
      "postalCode": "01000-000",
      "country": "BR"
    }))
    .unwrap()
  }

  #[test]
  fn customer_defaults_document_type_to_cpf() {
    let c = customer();
    assert_eq!(c.document_type.as_deref(), Some("CPF"));
    assert!(c.tax_identification().is_none());
    assert!(!c.has_document());
  }

  #[test]
  fn identification_takes_precedence_over_document_number() {
    let mut c = customer();
    c.document_number = Some("11111111111".into());
    c.identification = Some(Identification {
      kind: "CNPJ".into(),
      number: "22222222000122".into(),
    });
    let id = c.tax_identification().unwrap();
    assert_eq!(id.kind, "CNPJ");
    assert_eq!(id.number, "22222222000122");

    c.identification = None;
    let id = c.tax_identification().unwrap();
    assert_eq!(id.kind, "CPF");
    assert_eq!(id.number, "11111111111");
  }

  #[test]
  fn payment_method_wire_names() {
    let pm: PaymentMethod = serde_json::from_str("\"credit_card\"").unwrap();
    assert_eq!(pm, PaymentMethod::CreditCard);
    assert!(PaymentMethod::Pix.requires_document());
    assert!(PaymentMethod::Boleto.requires_document());
    assert!(!PaymentMethod::CreditCard.requires_document());
  }
}
