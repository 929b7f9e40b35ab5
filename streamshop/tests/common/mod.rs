// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use streamshop::gateway::{GatewayError, GatewayPayment, PaymentGateway, PaymentRequestBody};
use chrono::{Duration, Utc};
use streamshop::models::{Order, OrderItem, OrderStatus, PaymentMethod};
use streamshop::store::{MemoryStore, Store};
use streamshop::{AppConfig, AppState, Services};
use tokio::sync::Mutex;
use tracing::Level;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

/// What the fake gateway answers to the next create-payment call.
pub enum Scripted {
  Payment(GatewayPayment),
  Reject { status: u16, message: String },
}

/// In-process stand-in for the payment gateway.
#[derive(Default)]
pub struct FakeGateway {
  create_script: Mutex<VecDeque<Scripted>>,
  payments: Mutex<HashMap<String, GatewayPayment>>,
  pub created: Mutex<Vec<(PaymentRequestBody, String)>>,
}

impl FakeGateway {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub async fn script(&self, answer: Scripted) {
    self.create_script.lock().await.push_back(answer);
  }

  /// Makes `get_payment(payment.id)` return `payment`.
  pub async fn put_payment(&self, payment: GatewayPayment) {
    self.payments.lock().await.insert(payment.id.clone(), payment);
  }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
  async fn create_payment(
    &self,
    request: &PaymentRequestBody,
    idempotency_key: &str,
  ) -> Result<GatewayPayment, GatewayError> {
    self
      .created
      .lock()
      .await
      .push((request.clone(), idempotency_key.to_string()));
    match self.create_script.lock().await.pop_front() {
      Some(Scripted::Payment(payment)) => Ok(payment),
      Some(Scripted::Reject { status, message }) => Err(GatewayError::Rejected { status, message }),
      None => Err(GatewayError::Rejected {
        status: 500,
        message: "nothing scripted".to_string(),
      }),
    }
  }

  async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError> {
    self
      .payments
      .lock()
      .await
      .get(payment_id)
      .cloned()
      .ok_or(GatewayError::NotFound)
  }
}

pub fn payment(id: &str, status: &str, reference: Option<String>) -> GatewayPayment {
  GatewayPayment {
    id: id.to_string(),
    status: Some(status.to_string()),
    external_reference: reference,
    ..GatewayPayment::default()
  }
}

/// App state over a fresh in-memory store. `None` runs checkout in mock mode.
pub fn test_state(gateway: Option<Arc<FakeGateway>>) -> (AppState, MemoryStore) {
  setup_tracing();
  let store = MemoryStore::new();
  let services = Services {
    store: Arc::new(store.clone()),
    gateway: gateway.map(|g| g as Arc<dyn PaymentGateway>),
  };
  let state = AppState::build(AppConfig::for_tests(), services).unwrap();
  (state, store)
}

macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(streamshop::web::configure_app_routes),
    )
    .await
  };
}
pub(crate) use init_app;

pub fn customer(document: Option<&str>) -> Value {
  let mut c = json!({
    "email": "ana@example.com",
    "firstName": "Ana",
    "lastName": "Souza",
    "phone": "11999990000",
    "address": "Rua das Flores",
    "city": "Campinas",
    "postalCode": "13000-000",
    "country": "BR"
  });
  if let Some(doc) = document {
    c["documentNumber"] = json!(doc);
  }
  c
}

pub fn checkout_body(method: &str, document: Option<&str>, user_id: Option<Uuid>) -> Value {
  let method_id = if method == "credit_card" { "visa" } else { method };
  json!({
    "paymentData": {
      "token": "card-token",
      "installments": 1,
      "paymentMethodId": method_id,
      "transactionAmount": 26.91
    },
    "customerInfo": customer(document),
    "items": [{"productId": "netflix", "name": "Netflix Premium", "price": 29.9, "quantity": 1}],
    "subtotal": 29.9,
    "discount": 2.99,
    "total": 26.91,
    "couponCode": "BEMVINDO10",
    "userId": user_id,
    "sessionId": "session-1",
    "paymentMethod": method
  })
}

/// Polls until the order reaches `status`, for paths that return before the
/// background work finishes.
pub async fn wait_for_status(store: &MemoryStore, order_id: Uuid, status: OrderStatus) -> bool {
  for _ in 0..100 {
    if let Ok(Some(order)) = store.find_order(order_id).await {
      if order.status == status {
        return true;
      }
    }
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
  }
  false
}

/// Stores a PIX order the gateway left pending, as checkout would have.
pub async fn insert_pending_order(store: &MemoryStore) -> Uuid {
  let created_at = Utc::now() - Duration::minutes(1);
  let order = Order {
    id: Uuid::new_v4(),
    user_id: None,
    session_id: "session-1".to_string(),
    items: vec![OrderItem {
      product_id: "netflix".to_string(),
      name: "Netflix Premium".to_string(),
      price: 29.9,
      quantity: 1,
    }],
    subtotal: 29.9,
    discount: 0.0,
    total: 29.9,
    coupon_code: None,
    customer: serde_json::from_value(customer(Some("12345678909"))).unwrap(),
    payment_method: PaymentMethod::Pix,
    gateway_payment_id: "123".to_string(),
    gateway_status: Some("pending".to_string()),
    status: OrderStatus::Pending,
    pix_qr_code: Some("qr".to_string()),
    pix_qr_code_base64: None,
    boleto_url: None,
    boleto_barcode: None,
    created_at,
    updated_at: created_at,
  };
  store.insert_order(&order).await.unwrap();
  order.id
}
