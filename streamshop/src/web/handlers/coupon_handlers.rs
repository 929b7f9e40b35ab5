// streamshop/src/web/handlers/coupon_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::models::Coupon;
use crate::state::AppState;

#[instrument(name = "handler::validate_coupon", skip(app_state))]
pub async fn validate_coupon_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let code = Coupon::normalize_code(&path);
  app_state
    .services
    .store
    .find_active_coupon(&code)
    .await?
    .map(|coupon| HttpResponse::Ok().json(coupon))
    .ok_or_else(|| AppError::NotFound("Invalid coupon code".to_string()))
}
