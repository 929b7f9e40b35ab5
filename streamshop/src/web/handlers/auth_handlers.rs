// streamshop/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use shopflow::{ContextData, FlowOutcome};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::User;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
  pub email: String,
  pub password: String,
  pub first_name: String,
  pub last_name: String,
  #[serde(default)]
  pub phone: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
  pub email: String,
  pub password: String,
}

#[derive(Serialize, Debug)]
pub struct TokenResponse {
  pub token: String,
  pub user: User,
}

fn halted(flow: &str) -> AppError {
  warn!(flow, "Auth pipeline was stopped by a handler.");
  AppError::Internal(format!("{} process was halted.", flow))
}

#[instrument(name = "handler::register", skip(app_state, payload), fields(email = %payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let ctx = ContextData::new(SignupCtxData {
    services: app_state.services.clone(),
    jwt_secret: app_state.config.jwt_secret.clone(),
    email: payload.email,
    password: payload.password,
    first_name: payload.first_name,
    last_name: payload.last_name,
    phone: payload.phone,
    created_user: None,
    token: None,
  });

  if app_state.flows.signup.run(ctx.clone()).await? == FlowOutcome::Stopped {
    return Err(halted("Signup"));
  }

  let mut guard = ctx.write();
  let (token, user) = guard
    .token
    .take()
    .zip(guard.created_user.take())
    .ok_or_else(|| AppError::Internal("Signup finished without a user.".to_string()))?;
  info!(user_id = %user.id, "User registered.");
  Ok(HttpResponse::Ok().json(TokenResponse { token, user }))
}

#[instrument(name = "handler::login", skip(app_state, payload), fields(email = %payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let ctx = ContextData::new(SigninCtxData {
    services: app_state.services.clone(),
    jwt_secret: app_state.config.jwt_secret.clone(),
    email: payload.email,
    password: payload.password,
    user: None,
    token: None,
  });

  if app_state.flows.signin.run(ctx.clone()).await? == FlowOutcome::Stopped {
    return Err(halted("Signin"));
  }

  let mut guard = ctx.write();
  let (token, user) = guard
    .token
    .take()
    .zip(guard.user.take())
    .ok_or_else(|| AppError::Internal("Signin finished without a token.".to_string()))?;
  Ok(HttpResponse::Ok().json(TokenResponse { token, user }))
}

#[instrument(name = "handler::me", skip_all, fields(user_id = %user.0.id))]
pub async fn me_handler(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(user.0))
}
