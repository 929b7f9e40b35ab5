// streamshop/src/pipelines/checkout_pipeline.rs

//! Synchronous payment path: validate, charge (or simulate), persist.

use crate::errors::AppError;
use crate::gateway::{GatewayPayment, Payer, PayerAddress, PayerPhone, PaymentRequestBody};
use crate::models::{BoletoData, Order, OrderStatus, PaymentMethod, PixData};
use crate::pipelines::contexts::{CheckoutCtxData, CheckoutRequest, CheckoutResponse};
use chrono::{DateTime, Utc};
use shopflow::{ContextData, FlowError, Pipeline, Step, StepControl};
use tracing::{info, warn};
use uuid::Uuid;

pub const MOCK_PAYMENT_ID: &str = "mock";
const STATEMENT_DESCRIPTOR: &str = "STREAMSHOP";
const BOLETO_METHOD_ID: &str = "bolbradesco";
const BOLETO_FEDERAL_UNIT: &str = "SP";
const PLACEHOLDER_STREET_NUMBER: &str = "1";
const PLACEHOLDER_AREA_CODE: &str = "00";

fn is_mock(ctx: &ContextData<CheckoutCtxData>) -> bool {
  ctx.read().services.is_mock()
}

pub fn build_checkout_pipeline() -> Result<Pipeline<CheckoutCtxData, AppError>, FlowError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::with_steps(
    "checkout",
    [
      Step::required("validate_checkout_request"),
      Step::required("simulate_payment").skip_if(|ctx| !is_mock(ctx)),
      Step::required("build_gateway_request").skip_if(is_mock),
      Step::required("submit_to_gateway").skip_if(is_mock),
      Step::required("record_order"),
      Step::required("persist_order"),
    ],
  )?;

  p.on("validate_checkout_request", validate_checkout_request)?;
  p.on("simulate_payment", simulate_payment)?;
  p.on("build_gateway_request", build_gateway_request)?;
  p.on("submit_to_gateway", submit_to_gateway)?;
  p.on("record_order", record_order)?;
  p.on("persist_order", persist_order)?;

  Ok(p)
}

async fn validate_checkout_request(ctx: ContextData<CheckoutCtxData>) -> Result<StepControl, AppError> {
  let guard = ctx.read();
  info!(
    order_id = %guard.order_id,
    method = guard.request.payment_method.as_str(),
    "Processing payment."
  );
  validate_request(&guard.request)?;
  Ok(StepControl::Continue)
}

async fn simulate_payment(ctx: ContextData<CheckoutCtxData>) -> Result<StepControl, AppError> {
  let mut guard = ctx.write();
  warn!(order_id = %guard.order_id, "No payment gateway configured, approving in mock mode.");
  guard.payment = Some(GatewayPayment {
    id: MOCK_PAYMENT_ID.to_string(),
    status: Some("approved".to_string()),
    ..GatewayPayment::default()
  });
  Ok(StepControl::Continue)
}

async fn build_gateway_request(ctx: ContextData<CheckoutCtxData>) -> Result<StepControl, AppError> {
  let mut guard = ctx.write();
  let body = build_payment_request(&guard.request, guard.order_id)?;
  guard.gateway_request = Some(body);
  Ok(StepControl::Continue)
}

async fn submit_to_gateway(ctx: ContextData<CheckoutCtxData>) -> Result<StepControl, AppError> {
  let (gateway, body, order_id) = {
    let guard = ctx.read();
    (guard.services.gateway.clone(), guard.gateway_request.clone(), guard.order_id)
  };
  let gateway = gateway.ok_or_else(|| AppError::Internal("Gateway step ran without a gateway.".to_string()))?;
  let body = body.ok_or_else(|| AppError::Internal("Gateway request was not built.".to_string()))?;

  let payment = gateway.create_payment(&body, &order_id.to_string()).await?;
  info!(%order_id, payment_id = %payment.id, status = ?payment.status, "Gateway accepted the payment request.");
  ctx.write().payment = Some(payment);
  Ok(StepControl::Continue)
}

async fn record_order(ctx: ContextData<CheckoutCtxData>) -> Result<StepControl, AppError> {
  let mut guard = ctx.write();
  let payment = guard
    .payment
    .clone()
    .ok_or_else(|| AppError::Internal("No payment result to record.".to_string()))?;
  let message = if guard.services.is_mock() {
    "Mock payment".to_string()
  } else {
    format!("Payment {}", payment.status.as_deref().unwrap_or("unknown"))
  };
  let (order, response) = assemble_order(guard.order_id, &guard.request, &payment, message, Utc::now());
  guard.order = Some(order);
  guard.response = Some(response);
  Ok(StepControl::Continue)
}

async fn persist_order(ctx: ContextData<CheckoutCtxData>) -> Result<StepControl, AppError> {
  let (store, order) = {
    let guard = ctx.read();
    (guard.services.store.clone(), guard.order.clone())
  };
  let order = order.ok_or_else(|| AppError::Internal("No order to persist.".to_string()))?;
  store.insert_order(&order).await?;
  info!(order_id = %order.id, status = order.status.as_str(), "Order created.");
  Ok(StepControl::Continue)
}

// --- Pure helpers ---

pub fn validate_request(request: &CheckoutRequest) -> Result<(), AppError> {
  if request.items.is_empty() {
    return Err(AppError::Validation("Order must contain at least one item".to_string()));
  }
  if request.payment_method.requires_document() && !request.customer_info.has_document() {
    return Err(AppError::Validation("CPF/CNPJ is required for PIX and boleto payments".to_string()));
  }
  Ok(())
}

/// `Order 1a2b3c4d`: the first eight characters of the order id.
pub fn order_description(order_id: Uuid) -> String {
  let id = order_id.to_string();
  format!("Order {}", &id[..8])
}

/// Builds the method-specific body for the gateway's create-payment call.
pub fn build_payment_request(request: &CheckoutRequest, order_id: Uuid) -> Result<PaymentRequestBody, AppError> {
  let customer = &request.customer_info;
  let payer = Payer {
    email: customer.email.clone(),
    first_name: customer.first_name.clone(),
    last_name: customer.last_name.clone(),
    identification: customer.tax_identification(),
    phone: None,
    address: None,
  };
  let base = PaymentRequestBody {
    transaction_amount: request.total,
    token: None,
    description: order_description(order_id),
    payment_method_id: String::new(),
    installments: None,
    issuer_id: None,
    payer,
    external_reference: order_id.to_string(),
    statement_descriptor: None,
  };

  let body = match request.payment_method {
    PaymentMethod::CreditCard => {
      let token = request
        .payment_data
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Card token is required".to_string()))?;
      PaymentRequestBody {
        token: Some(token),
        payment_method_id: request.payment_data.payment_method_id.clone(),
        installments: Some(request.payment_data.installments),
        issuer_id: request.payment_data.issuer_id.clone(),
        statement_descriptor: Some(STATEMENT_DESCRIPTOR.to_string()),
        payer: Payer {
          phone: Some(PayerPhone {
            area_code: PLACEHOLDER_AREA_CODE.to_string(),
            number: customer.phone.clone(),
          }),
          address: Some(PayerAddress {
            street_name: customer.address.clone(),
            street_number: PLACEHOLDER_STREET_NUMBER.to_string(),
            city: None,
            federal_unit: None,
            zip_code: customer.postal_code.clone(),
          }),
          ..base.payer.clone()
        },
        ..base
      }
    }
    PaymentMethod::Pix => PaymentRequestBody {
      payment_method_id: "pix".to_string(),
      ..base
    },
    PaymentMethod::Boleto => PaymentRequestBody {
      payment_method_id: BOLETO_METHOD_ID.to_string(),
      payer: Payer {
        address: Some(PayerAddress {
          street_name: customer.address.clone(),
          street_number: PLACEHOLDER_STREET_NUMBER.to_string(),
          city: Some(customer.city.clone()),
          federal_unit: Some(BOLETO_FEDERAL_UNIT.to_string()),
          zip_code: customer.postal_code.clone(),
        }),
        ..base.payer.clone()
      },
      ..base
    },
  };
  Ok(body)
}

pub fn pix_artifacts(method: PaymentMethod, payment: &GatewayPayment) -> Option<PixData> {
  if method != PaymentMethod::Pix {
    return None;
  }
  let data = payment.point_of_interaction.as_ref()?.transaction_data.as_ref()?;
  let qr_code = data.qr_code.clone().filter(|q| !q.is_empty())?;
  Some(PixData {
    qr_code,
    qr_code_base64: data.qr_code_base64.clone().unwrap_or_default(),
    expiration_date: payment.date_of_expiration.clone(),
  })
}

pub fn boleto_artifacts(method: PaymentMethod, payment: &GatewayPayment) -> Option<BoletoData> {
  if method != PaymentMethod::Boleto {
    return None;
  }
  let details = payment.transaction_details.as_ref()?;
  let boleto_url = details.external_resource_url.clone().filter(|u| !u.is_empty())?;
  Some(BoletoData {
    boleto_url,
    barcode: details.digitable_line.clone().unwrap_or_default(),
    expiration_date: payment.date_of_expiration.clone(),
  })
}

/// Turns the gateway's answer into the order to store and the response to send.
pub fn assemble_order(
  order_id: Uuid,
  request: &CheckoutRequest,
  payment: &GatewayPayment,
  message: String,
  now: DateTime<Utc>,
) -> (Order, CheckoutResponse) {
  let method = request.payment_method;
  let status = OrderStatus::from_gateway_status(payment.status.as_deref());
  let pix = pix_artifacts(method, payment);
  let boleto = boleto_artifacts(method, payment);

  let order = Order {
    id: order_id,
    user_id: request.user_id,
    session_id: request.session_id.clone(),
    items: request.items.clone(),
    subtotal: request.subtotal,
    discount: request.discount,
    total: request.total,
    coupon_code: request.coupon_code.clone(),
    customer: request.customer_info.clone(),
    payment_method: method,
    gateway_payment_id: payment.id.clone(),
    gateway_status: payment.status.clone(),
    status,
    pix_qr_code: pix.as_ref().map(|p| p.qr_code.clone()),
    pix_qr_code_base64: pix.as_ref().map(|p| p.qr_code_base64.clone()),
    boleto_url: boleto.as_ref().map(|b| b.boleto_url.clone()),
    boleto_barcode: boleto.as_ref().map(|b| b.barcode.clone()),
    created_at: now,
    updated_at: now,
  };
  let response = CheckoutResponse {
    status,
    order_id,
    payment_id: Some(payment.id.clone()),
    payment_method: method,
    message,
    pix,
    boleto,
  };
  (order, response)
}
