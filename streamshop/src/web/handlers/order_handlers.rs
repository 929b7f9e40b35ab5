// streamshop/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use super::parse_id;
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::LIST_LIMIT;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::list_orders", skip_all, fields(user_id = %user.0.id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .services
    .store
    .list_orders_for_user(user.0.id, LIST_LIMIT)
    .await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::get_order", skip(app_state))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_id = parse_id(&path, "Order")?;
  app_state
    .services
    .store
    .find_order(order_id)
    .await?
    .map(|order| HttpResponse::Ok().json(order))
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}
