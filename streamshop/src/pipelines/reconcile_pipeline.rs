// streamshop/src/pipelines/reconcile_pipeline.rs

//! Asynchronous payment path: a webhook names a payment, the gateway is asked
//! for its current state, and the matching order is updated.

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::pipelines::contexts::{ReconcileCtxData, ReconcileOutcome};
use chrono::Utc;
use shopflow::{ContextData, FlowError, Pipeline, Step, StepControl};
use tracing::{info, warn};
use uuid::Uuid;

pub fn build_reconcile_pipeline() -> Result<Pipeline<ReconcileCtxData, AppError>, FlowError> {
  let mut p = Pipeline::<ReconcileCtxData, AppError>::with_steps(
    "reconcile_payment",
    [
      Step::required("fetch_payment"),
      Step::required("resolve_order_reference"),
      Step::required("update_order_status"),
    ],
  )?;

  p.on("fetch_payment", fetch_payment)?;
  p.on("resolve_order_reference", resolve_order_reference)?;
  p.on("update_order_status", update_order_status)?;

  Ok(p)
}

/// The webhook body's status is never trusted; the gateway is the source of truth.
async fn fetch_payment(ctx: ContextData<ReconcileCtxData>) -> Result<StepControl, AppError> {
  let (gateway, payment_id) = {
    let guard = ctx.read();
    (guard.services.gateway.clone(), guard.payment_id.clone())
  };
  let gateway = gateway.ok_or_else(|| AppError::GatewayUnavailable("Payment service not configured".to_string()))?;

  let payment = gateway.get_payment(&payment_id).await?;
  info!(%payment_id, status = ?payment.status, reference = ?payment.external_reference, "Fetched payment.");
  ctx.write().payment = Some(payment);
  Ok(StepControl::Continue)
}

async fn resolve_order_reference(ctx: ContextData<ReconcileCtxData>) -> Result<StepControl, AppError> {
  let mut guard = ctx.write();
  let reference = guard.payment.as_ref().and_then(|p| p.external_reference.clone());
  match reference.as_deref().and_then(|r| Uuid::parse_str(r.trim()).ok()) {
    Some(order_id) => {
      guard.order_id = Some(order_id);
      Ok(StepControl::Continue)
    }
    None => {
      warn!(payment_id = %guard.payment_id, ?reference, "Payment has no usable order reference.");
      guard.outcome = Some(ReconcileOutcome::MissingReference);
      Ok(StepControl::Stop)
    }
  }
}

async fn update_order_status(ctx: ContextData<ReconcileCtxData>) -> Result<StepControl, AppError> {
  let (store, order_id, gateway_status) = {
    let guard = ctx.read();
    (
      guard.services.store.clone(),
      guard.order_id,
      guard.payment.as_ref().and_then(|p| p.status.clone()),
    )
  };
  let order_id = order_id.ok_or_else(|| AppError::Internal("Order reference was not resolved.".to_string()))?;
  let status = OrderStatus::from_gateway_status(gateway_status.as_deref());

  let updated = store
    .update_order_status(order_id, gateway_status.as_deref(), status, Utc::now())
    .await?;

  let outcome = if updated {
    info!(%order_id, status = status.as_str(), "Order updated.");
    ReconcileOutcome::Updated { order_id, status }
  } else {
    warn!(%order_id, "No order matches the payment reference.");
    ReconcileOutcome::OrderNotFound { order_id }
  };
  ctx.write().outcome = Some(outcome);
  Ok(StepControl::Continue)
}
