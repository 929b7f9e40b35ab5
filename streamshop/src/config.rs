// streamshop/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

const DEV_JWT_SECRET: &str = "streamshop-dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// Empty means no gateway: checkout runs in mock mode.
  pub mercadopago_access_token: Option<String>,
  pub mercadopago_public_key: String,
  pub mercadopago_api_url: String,
  pub gateway_timeout: Duration,

  pub jwt_secret: String,
  pub cors_origins: Vec<String>,

  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let server_port = get_env("PORT")
      .unwrap_or_else(|_| "10000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let mercadopago_access_token = get_env("MERCADOPAGO_ACCESS_TOKEN")
      .ok()
      .map(|t| t.trim().to_string())
      .filter(|t| !t.is_empty());
    let mercadopago_public_key = get_env("MERCADOPAGO_PUBLIC_KEY").unwrap_or_default();
    let mercadopago_api_url =
      get_env("MERCADOPAGO_API_URL").unwrap_or_else(|_| "https://api.mercadopago.com".to_string());
    let gateway_timeout = get_env("GATEWAY_TIMEOUT_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse::<u64>()
      .map(Duration::from_secs)
      .map_err(|e| AppError::Config(format!("Invalid GATEWAY_TIMEOUT_SECS: {}", e)))?;

    let jwt_secret = match get_env("JWT_SECRET") {
      Ok(secret) if !secret.is_empty() => secret,
      _ => {
        tracing::warn!("JWT_SECRET not set, using the development secret.");
        DEV_JWT_SECRET.to_string()
      }
    };

    let cors_origins = parse_origins(&get_env("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    if mercadopago_access_token.is_none() {
      tracing::warn!("MERCADOPAGO_ACCESS_TOKEN not set, payments run in mock mode.");
    }
    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      mercadopago_access_token,
      mercadopago_public_key,
      mercadopago_api_url,
      gateway_timeout,
      jwt_secret,
      cors_origins,
      seed_db,
    })
  }

  /// A config suitable for tests: no gateway, no database URL.
  pub fn for_tests() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      database_url: String::new(),
      mercadopago_access_token: None,
      mercadopago_public_key: "TEST-public-key".to_string(),
      mercadopago_api_url: "http://localhost".to_string(),
      gateway_timeout: Duration::from_secs(5),
      jwt_secret: "test-secret".to_string(),
      cors_origins: vec!["*".to_string()],
      seed_db: false,
    }
  }
}

fn parse_origins(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|o| !o.is_empty())
    .map(str::to_string)
    .collect()
}
