// streamshop/src/main.rs

use actix_cors::Cors;
use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use streamshop::gateway::{MercadoPagoGateway, PaymentGateway};
use streamshop::store::PgStore;
use streamshop::web::configure_app_routes;
use streamshop::{seed, AppConfig, AppState, Services};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn cors_layer(origins: &[String]) -> Cors {
  let cors = Cors::default().allow_any_method().allow_any_header().supports_credentials();
  if origins.iter().any(|o| o == "*") {
    // Credentials forbid a literal `*`, so the request origin is echoed back.
    return cors.allowed_origin_fn(|_, _| true);
  }
  origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting StreamShop API server...");

  let config = AppConfig::from_env().context("loading configuration")?;

  let pool = PgPoolOptions::new()
    .max_connections(10)
    .connect(&config.database_url)
    .await
    .context("connecting to the database")?;
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("running database migrations")?;
  tracing::info!("Database ready.");

  let gateway = match &config.mercadopago_access_token {
    Some(token) => {
      let client = MercadoPagoGateway::new(&config.mercadopago_api_url, token, config.gateway_timeout)
        .context("building the Mercado Pago client")?;
      Some(Arc::new(client) as Arc<dyn PaymentGateway>)
    }
    None => None,
  };

  let services = Services {
    store: Arc::new(PgStore::new(pool)),
    gateway,
  };

  if config.seed_db {
    seed::seed_store(services.store.as_ref()).await.context("seeding the database")?;
  }

  let app_state = AppState::build(config, services).context("building application state")?;
  let server_address = format!("{}:{}", app_state.config.server_host, app_state.config.server_port);
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(cors_layer(&app_state.config.cors_origins))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await?;

  Ok(())
}
