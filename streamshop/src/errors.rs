// streamshop/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use shopflow::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  /// The gateway answered but refused the payment; the message is the gateway's.
  #[error("Payment Gateway Error: {0}")]
  Gateway(String),

  #[error("Payment Service Unavailable: {0}")]
  GatewayUnavailable(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Gateway Transport Error: {0}")]
  Http(#[from] reqwest::Error),

  /// A bearer token that failed verification. Signing faults are `Internal`.
  #[error("Token Error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::Gateway(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) | AppError::Token(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Http(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let message = match self {
      AppError::Validation(m)
      | AppError::Auth(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m)
      | AppError::Gateway(m)
      | AppError::GatewayUnavailable(m) => {
        tracing::warn!(application_error = %self, "Responding with client error");
        m.clone()
      }
      AppError::Token(_) => {
        tracing::warn!(application_error = %self, "Rejected bearer token");
        "Not authenticated".to_string()
      }
      _ => {
        // Internal detail stays in the logs.
        tracing::error!(application_error = %self, "Responding with internal error");
        "An internal error occurred".to_string()
      }
    };
    HttpResponse::build(status).json(json!({ "error": message }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
