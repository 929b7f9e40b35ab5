// streamshop/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::models::User;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::{auth_service, tokens};
use shopflow::{ContextData, FlowError, Pipeline, Step, StepControl};
use tracing::{info, warn};

pub fn build_signin_pipeline() -> Result<Pipeline<SigninCtxData, AppError>, FlowError> {
  let mut p = Pipeline::<SigninCtxData, AppError>::with_steps(
    "signin",
    [
      Step::required("lookup_user"),
      Step::required("verify_password"),
      Step::required("issue_token"),
    ],
  )?;

  p.on("lookup_user", |ctx: ContextData<SigninCtxData>| async move {
    let (store, email) = {
      let guard = ctx.read();
      (guard.services.store.clone(), User::normalize_email(&guard.email))
    };
    match store.find_user_by_email(&email).await? {
      Some(user) => {
        ctx.write().user = Some(user);
        Ok(StepControl::Continue)
      }
      None => {
        warn!(%email, "Signin for unknown email.");
        Err(AppError::Auth("Invalid credentials".to_string()))
      }
    }
  })?;

  p.on("verify_password", |ctx: ContextData<SigninCtxData>| async move {
    let guard = ctx.read();
    let user = guard
      .user
      .as_ref()
      .ok_or_else(|| AppError::Internal("Signin user was not loaded.".to_string()))?;
    if !auth_service::verify_password(&user.password_hash, &guard.password)? {
      warn!(user_id = %user.id, "Signin with wrong password.");
      return Err(AppError::Auth("Invalid credentials".to_string()));
    }
    Ok::<_, AppError>(StepControl::Continue)
  })?;

  p.on("issue_token", |ctx: ContextData<SigninCtxData>| async move {
    let mut guard = ctx.write();
    let user_id = guard
      .user
      .as_ref()
      .map(|u| u.id)
      .ok_or_else(|| AppError::Internal("Signin user was not loaded.".to_string()))?;
    guard.token = Some(tokens::issue_token(user_id, &guard.jwt_secret)?);
    info!(%user_id, "User signed in.");
    Ok::<_, AppError>(StepControl::Continue)
  })?;

  Ok(p)
}
