// streamshop/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::AppError;
use crate::models::{Cart, CartItem};
use crate::state::AppState;
use crate::web::extractors::MaybeUser;

#[instrument(
  name = "handler::get_cart",
  skip(app_state, user),
  fields(authenticated = user.0.is_some())
)]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let session_id = path.into_inner();
  let owner = user.0.map(|u| u.id);
  match app_state.services.store.find_cart(&session_id, owner).await? {
    Some(cart) => Ok(HttpResponse::Ok().json(cart)),
    None => Ok(HttpResponse::Ok().json(json!({ "items": [] }))),
  }
}

/// Replaces the cart's items wholesale.
#[instrument(
  name = "handler::update_cart",
  skip(app_state, items, user),
  fields(items = items.len(), authenticated = user.0.is_some())
)]
pub async fn update_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  items: web::Json<Vec<CartItem>>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let items = items.into_inner();
  if let Some(bad) = items.iter().find(|i| i.quantity <= 0) {
    return Err(AppError::Validation(format!(
      "Quantity for product {} must be positive",
      bad.product_id
    )));
  }

  let cart = Cart {
    session_id: path.into_inner(),
    user_id: user.0.map(|u| u.id),
    items,
    updated_at: Utc::now(),
  };
  app_state.services.store.upsert_cart(&cart).await?;
  debug!(session_id = %cart.session_id, "Cart replaced.");
  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
