// streamshop/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{
  auth_handlers, cart_handlers, coupon_handlers, health_handlers, order_handlers, payment_handlers,
  product_handlers, seed_handlers, webhook_handlers,
};
use actix_web::web;

/// Extractor failures answer with the same `{"error": ...}` body as handlers.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()));
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  extractor_configs(cfg);
  cfg.route("/", web::get().to(health_handlers::root_handler)).service(
    web::scope("/api")
      .route("/health", web::get().to(health_handlers::health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .service(
        web::resource("/cart/{session_id}")
          .route(web::get().to(cart_handlers::get_cart_handler))
          .route(web::post().to(cart_handlers::update_cart_handler)),
      )
      .route(
        "/coupons/validate/{code}",
        web::get().to(coupon_handlers::validate_coupon_handler),
      )
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
      )
      .service(
        web::scope("/payments")
          .route("/process", web::post().to(payment_handlers::process_payment_handler))
          .route("/config", web::get().to(payment_handlers::payment_config_handler))
          .route("/status/{payment_id}", web::get().to(payment_handlers::payment_status_handler))
          .route("/order/{order_id}", web::get().to(payment_handlers::payment_by_order_handler)),
      )
      .route(
        "/webhooks/mercadopago",
        web::post().to(webhook_handlers::mercadopago_webhook_handler),
      )
      .route("/seed", web::post().to(seed_handlers::seed_handler)),
  );
}
