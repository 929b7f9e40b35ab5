// streamshop/src/web/handlers/health_handlers.rs

use actix_web::HttpResponse;
use serde_json::json;

pub async fn root_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok", "service": "StreamShop API" }))
}

pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "healthy" }))
}
