// streamshop/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::models::User;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::{auth_service, tokens};
use chrono::Utc;
use shopflow::{ContextData, FlowError, Pipeline, Step, StepControl};
use tracing::{debug, info, warn};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

pub fn build_signup_pipeline() -> Result<Pipeline<SignupCtxData, AppError>, FlowError> {
  let mut p = Pipeline::<SignupCtxData, AppError>::with_steps(
    "signup",
    [
      Step::required("validate_signup_input"),
      Step::required("check_existing_user"),
      Step::required("create_user"),
      Step::required("issue_token"),
    ],
  )?;

  p.on("validate_signup_input", |ctx: ContextData<SignupCtxData>| async move {
    let mut guard = ctx.write();
    guard.email = User::normalize_email(&guard.email);
    guard.first_name = guard.first_name.trim().to_string();
    guard.last_name = guard.last_name.trim().to_string();
    debug!(email = %guard.email, "Validating signup input.");

    if guard.email.is_empty() || !guard.email.contains('@') {
      return Err(AppError::Validation("Valid email is required.".to_string()));
    }
    if guard.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(AppError::Validation(format!(
        "Password must be at least {} characters long.",
        MIN_PASSWORD_LEN
      )));
    }
    if guard.first_name.is_empty() || guard.last_name.is_empty() {
      return Err(AppError::Validation("First and last name are required.".to_string()));
    }
    Ok::<_, AppError>(StepControl::Continue)
  })?;

  // The unique index still backs this up when two signups race.
  p.on("check_existing_user", |ctx: ContextData<SignupCtxData>| async move {
    let (store, email) = {
      let guard = ctx.read();
      (guard.services.store.clone(), guard.email.clone())
    };
    if store.find_user_by_email(&email).await?.is_some() {
      warn!(%email, "Signup attempted with a registered email.");
      return Err(AppError::Conflict("Email already registered".to_string()));
    }
    Ok::<_, AppError>(StepControl::Continue)
  })?;

  p.on("create_user", |ctx: ContextData<SignupCtxData>| async move {
    let (store, user) = {
      let guard = ctx.read();
      let user = User {
        id: Uuid::new_v4(),
        email: guard.email.clone(),
        password_hash: auth_service::hash_password(&guard.password)?,
        first_name: guard.first_name.clone(),
        last_name: guard.last_name.clone(),
        phone: guard.phone.clone().filter(|p| !p.trim().is_empty()),
        created_at: Utc::now(),
      };
      (guard.services.store.clone(), user)
    };
    store.create_user(&user).await?;
    info!(user_id = %user.id, "User created.");
    ctx.write().created_user = Some(user);
    Ok::<_, AppError>(StepControl::Continue)
  })?;

  p.on("issue_token", |ctx: ContextData<SignupCtxData>| async move {
    let mut guard = ctx.write();
    let user_id = guard
      .created_user
      .as_ref()
      .map(|u| u.id)
      .ok_or_else(|| AppError::Internal("Signup completed without creating a user.".to_string()))?;
    guard.token = Some(tokens::issue_token(user_id, &guard.jwt_secret)?);
    Ok::<_, AppError>(StepControl::Continue)
  })?;

  Ok(p)
}
