// streamshop/src/pipelines/contexts.rs

//! Per-run data for each pipeline. Handlers receive these wrapped in
//! `shopflow::ContextData`.

use crate::gateway::{flexible_id_opt, GatewayPayment, PaymentRequestBody};
use crate::models::{BoletoData, CustomerInfo, Order, OrderItem, OrderStatus, PaymentMethod, PixData, User};
use crate::state::Services;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Auth ---

pub struct SignupCtxData {
  pub services: Services,
  pub jwt_secret: String,
  pub email: String,
  pub password: String,
  pub first_name: String,
  pub last_name: String,
  pub phone: Option<String>,
  pub created_user: Option<User>,
  pub token: Option<String>,
}

pub struct SigninCtxData {
  pub services: Services,
  pub jwt_secret: String,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub token: Option<String>,
}

// --- Checkout ---

fn one() -> i32 {
  1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodData {
  #[serde(default)]
  pub token: Option<String>,
  #[serde(default = "one")]
  pub installments: i32,
  #[serde(default)]
  pub payment_method_id: String,
  #[serde(default, deserialize_with = "flexible_id_opt")]
  pub issuer_id: Option<String>,
  #[serde(default)]
  pub transaction_amount: f64,
}

/// Body of `POST /api/payments/process`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub payment_data: PaymentMethodData,
  pub customer_info: CustomerInfo,
  pub items: Vec<OrderItem>,
  pub subtotal: f64,
  pub discount: f64,
  pub total: f64,
  #[serde(default)]
  pub coupon_code: Option<String>,
  #[serde(default)]
  pub user_id: Option<Uuid>,
  pub session_id: String,
  #[serde(default)]
  pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
  pub status: OrderStatus,
  pub order_id: Uuid,
  pub payment_id: Option<String>,
  pub payment_method: PaymentMethod,
  pub message: String,
  pub pix: Option<PixData>,
  pub boleto: Option<BoletoData>,
}

pub struct CheckoutCtxData {
  pub services: Services,
  pub request: CheckoutRequest,
  /// Generated before the run; doubles as the gateway's external reference.
  pub order_id: Uuid,
  pub gateway_request: Option<PaymentRequestBody>,
  pub payment: Option<GatewayPayment>,
  pub order: Option<Order>,
  pub response: Option<CheckoutResponse>,
}

impl CheckoutCtxData {
  pub fn new(services: Services, request: CheckoutRequest) -> Self {
    Self {
      services,
      request,
      order_id: Uuid::new_v4(),
      gateway_request: None,
      payment: None,
      order: None,
      response: None,
    }
  }
}

// --- Reconciliation ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
  Updated { order_id: Uuid, status: OrderStatus },
  /// The payment's external reference is missing or not an order id.
  MissingReference,
  OrderNotFound { order_id: Uuid },
  /// No gateway configured.
  Skipped,
  Failed(String),
}

pub struct ReconcileCtxData {
  pub services: Services,
  pub payment_id: String,
  pub payment: Option<GatewayPayment>,
  pub order_id: Option<Uuid>,
  pub outcome: Option<ReconcileOutcome>,
}

impl ReconcileCtxData {
  pub fn new(services: Services, payment_id: impl Into<String>) -> Self {
    Self {
      services,
      payment_id: payment_id.into(),
      payment: None,
      order_id: None,
      outcome: None,
    }
  }
}
