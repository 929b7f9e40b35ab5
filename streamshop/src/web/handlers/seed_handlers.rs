// streamshop/src/web/handlers/seed_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::seed::{seed_store, SeedOutcome};
use crate::state::AppState;

#[instrument(name = "handler::seed", skip(app_state))]
pub async fn seed_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let body = match seed_store(app_state.services.store.as_ref()).await? {
    SeedOutcome::AlreadySeeded => json!({ "message": "Already seeded" }),
    SeedOutcome::Seeded { products, .. } => json!({ "message": "Seeded", "products": products }),
  };
  Ok(HttpResponse::Ok().json(body))
}
