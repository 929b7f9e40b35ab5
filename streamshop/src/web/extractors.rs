// streamshop/src/web/extractors.rs

//! Bearer-token identity extractors.

use crate::errors::AppError;
use crate::models::User;
use crate::services::tokens;
use crate::state::AppState;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

/// The signed-in user. Rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// The signed-in user if the request carries a valid token. Missing or bad
/// tokens are treated as anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

fn bearer_token(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .cloned()
    .ok_or_else(|| AppError::Internal("AppState is not registered".to_string()))
}

async fn load_user(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
  let user_id = tokens::verify_token(token, &state.config.jwt_secret)?;
  state.services.store.find_user_by_id(user_id).await
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = app_state(req);
    let token = bearer_token(req);
    Box::pin(async move {
      let state = state?;
      let token = token.ok_or_else(|| AppError::Auth("Not authenticated".to_string()))?;
      load_user(&state, &token)
        .await?
        .map(AuthenticatedUser)
        .ok_or_else(|| AppError::Auth("Not authenticated".to_string()))
    })
  }
}

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = app_state(req);
    let token = bearer_token(req);
    Box::pin(async move {
      let state = state?;
      let Some(token) = token else {
        return Ok(MaybeUser(None));
      };
      match load_user(&state, &token).await {
        Ok(user) => Ok(MaybeUser(user)),
        Err(AppError::Token(e)) => {
          debug!(error = %e, "Ignoring invalid bearer token on optional-auth route.");
          Ok(MaybeUser(None))
        }
        Err(other) => Err(other),
      }
    })
  }
}
