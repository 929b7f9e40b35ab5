// streamshop/src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::gateway::flexible_id_opt;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-signature";
const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub data: Option<WebhookData>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
  #[serde(default, deserialize_with = "flexible_id_opt")]
  pub id: Option<String>,
}

impl WebhookPayload {
  /// The payment id to reconcile, for `payment` notifications only.
  pub fn payment_id(&self) -> Option<&str> {
    if self.kind.as_deref() != Some("payment") {
      return None;
    }
    self.data.as_ref()?.id.as_deref().filter(|id| !id.is_empty())
  }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
  req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Always answers 200 so the gateway does not keep redelivering; failures
/// are reported in the body. The signature is logged, not verified.
#[instrument(name = "handler::mercadopago_webhook", skip_all)]
pub async fn mercadopago_webhook_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> HttpResponse {
  let (Some(signature), Some(request_id)) = (header(&req, SIGNATURE_HEADER), header(&req, REQUEST_ID_HEADER)) else {
    warn!("Webhook without signature headers.");
    return HttpResponse::Ok().json(json!({ "status": "error", "message": "Missing signature headers" }));
  };
  info!(%request_id, %signature, "Webhook received.");

  let payload: WebhookPayload = match serde_json::from_slice(&body) {
    Ok(p) => p,
    Err(e) => {
      warn!(error = %e, "Webhook body is not valid JSON.");
      return HttpResponse::Ok().json(json!({ "status": "error", "message": "Invalid JSON payload" }));
    }
  };

  match payload.payment_id() {
    Some(payment_id) => {
      info!(%payment_id, "Queueing payment reconciliation.");
      // Fire and forget: the receipt is only useful to tests.
      drop(app_state.reconciler.enqueue(payment_id));
    }
    None => info!(kind = ?payload.kind, "Ignoring webhook notification."),
  }

  HttpResponse::Ok().json(json!({ "status": "received" }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_payment_notifications_carry_an_id() {
    let p: WebhookPayload = serde_json::from_str(r#"{"type":"payment","data":{"id":123}}"#).unwrap();
    assert_eq!(p.payment_id(), Some("123"));
    let p: WebhookPayload = serde_json::from_str(r#"{"type":"payment","data":{"id":"abc"}}"#).unwrap();
    assert_eq!(p.payment_id(), Some("abc"));
    let p: WebhookPayload = serde_json::from_str(r#"{"type":"plan","data":{"id":"1"}}"#).unwrap();
    assert_eq!(p.payment_id(), None);
    let p: WebhookPayload = serde_json::from_str(r#"{"type":"payment"}"#).unwrap();
    assert_eq!(p.payment_id(), None);
  }
}
