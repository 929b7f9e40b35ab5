// streamshop/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use shopflow::{ContextData, FlowOutcome};
use tracing::{instrument, warn};

use super::parse_id;
use crate::errors::AppError;
use crate::pipelines::contexts::{CheckoutCtxData, CheckoutRequest};
use crate::state::AppState;

#[instrument(
  name = "handler::process_payment",
  skip(app_state, payload),
  fields(method = payload.payment_method.as_str(), session_id = %payload.session_id)
)]
pub async fn process_payment_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
  let ctx = ContextData::new(CheckoutCtxData::new(app_state.services.clone(), payload.into_inner()));

  if app_state.flows.checkout.run(ctx.clone()).await? == FlowOutcome::Stopped {
    warn!("Checkout pipeline was stopped by a handler.");
    return Err(AppError::Internal("Checkout process was halted.".to_string()));
  }

  let response = ctx
    .write()
    .response
    .take()
    .ok_or_else(|| AppError::Internal("Checkout finished without a response.".to_string()))?;
  Ok(HttpResponse::Ok().json(response))
}

pub async fn payment_config_handler(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok().json(json!({ "publicKey": app_state.config.mercadopago_public_key }))
}

#[instrument(name = "handler::payment_status", skip(app_state))]
pub async fn payment_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let gateway = app_state
    .services
    .gateway
    .clone()
    .ok_or_else(|| AppError::GatewayUnavailable("Payment service not configured".to_string()))?;

  let payment = gateway.get_payment(&path).await.map_err(|e| {
    warn!(error = %e, "Payment lookup failed.");
    AppError::NotFound("Payment not found".to_string())
  })?;

  Ok(HttpResponse::Ok().json(json!({
    "status": payment.status,
    "statusDetail": payment.status_detail,
    "paymentMethod": payment.payment_method_id,
  })))
}

/// The order plus its PIX or boleto artifacts, for the post-checkout page.
#[instrument(name = "handler::payment_by_order", skip(app_state))]
pub async fn payment_by_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_id = parse_id(&path, "Order")?;
  let order = app_state
    .services
    .store
    .find_order(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  let mut body = serde_json::to_value(&order)
    .map_err(|e| AppError::Internal(format!("Failed to serialize order: {}", e)))?;
  if let Some(fields) = body.as_object_mut() {
    if let Some(pix) = order.pix() {
      fields.insert("pix".to_string(), json!(pix));
    }
    if let Some(boleto) = order.boleto() {
      fields.insert("boleto".to_string(), json!(boleto));
    }
  }
  Ok(HttpResponse::Ok().json(json!({ "success": true, "order": body })))
}
