// streamshop/src/gateway/mercadopago.rs

use super::{GatewayError, GatewayPayment, PaymentGateway, PaymentRequestBody};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// REST client for `/v1/payments`, authenticated with the account's access token.
pub struct MercadoPagoGateway {
  client: Client,
  base_url: Url,
  access_token: String,
}

impl MercadoPagoGateway {
  pub fn new(base_url: &str, access_token: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
    let base_url = Url::parse(base_url).map_err(|e| GatewayError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
    if base_url.cannot_be_a_base() {
      return Err(GatewayError::InvalidBaseUrl(base_url.to_string()));
    }
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      base_url,
      access_token: access_token.into(),
    })
  }

  /// `<base>/v1/payments`, with `payment_id` appended as one percent-encoded segment.
  fn payments_url(&self, payment_id: Option<&str>) -> Url {
    let mut url = self.base_url.clone();
    // Cannot fail: `new` rejects cannot-be-a-base URLs.
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().extend(["v1", "payments"]);
      if let Some(id) = payment_id {
        segments.push(id);
      }
    }
    url
  }

  async fn rejection(response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let message = response
      .json::<Value>()
      .await
      .ok()
      .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
      .unwrap_or_else(|| "Unknown".to_string());
    warn!(status, %message, "Mercado Pago rejected the request.");
    GatewayError::Rejected { status, message }
  }
}

#[async_trait]
impl PaymentGateway for MercadoPagoGateway {
  #[instrument(
    name = "mercadopago::create_payment",
    skip_all,
    fields(method = %request.payment_method_id, reference = %request.external_reference),
    err(Display)
  )]
  async fn create_payment(
    &self,
    request: &PaymentRequestBody,
    idempotency_key: &str,
  ) -> Result<GatewayPayment, GatewayError> {
    let response = self
      .client
      .post(self.payments_url(None))
      .bearer_auth(&self.access_token)
      .header("X-Idempotency-Key", idempotency_key)
      .json(request)
      .send()
      .await?;

    debug!(status = response.status().as_u16(), "Mercado Pago answered create.");
    if !response.status().is_success() {
      return Err(Self::rejection(response).await);
    }
    Ok(response.json::<GatewayPayment>().await?)
  }

  #[instrument(name = "mercadopago::get_payment", skip(self), err(Display))]
  async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError> {
    // Dot segments would be dropped from the path and hit the collection itself.
    if matches!(payment_id, "" | "." | "..") {
      return Err(GatewayError::NotFound);
    }
    let response = self
      .client
      .get(self.payments_url(Some(payment_id)))
      .bearer_auth(&self.access_token)
      .send()
      .await?;

    match response.status() {
      StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
      s if s.is_success() => Ok(response.json::<GatewayPayment>().await?),
      _ => Err(Self::rejection(response).await),
    }
  }
}
