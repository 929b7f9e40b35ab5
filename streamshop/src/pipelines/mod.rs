// streamshop/src/pipelines/mod.rs

//! Step pipelines for the application's multi-stage operations.

use crate::errors::AppError;
use shopflow::{FlowError, Pipeline};

pub mod contexts;

pub mod checkout_pipeline;
pub mod reconcile_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

use contexts::{CheckoutCtxData, ReconcileCtxData, SigninCtxData, SignupCtxData};

/// Every pipeline the application runs, built once at startup.
pub struct Flows {
  pub signup: Pipeline<SignupCtxData, AppError>,
  pub signin: Pipeline<SigninCtxData, AppError>,
  pub checkout: Pipeline<CheckoutCtxData, AppError>,
  pub reconcile: Pipeline<ReconcileCtxData, AppError>,
}

impl Flows {
  pub fn build() -> Result<Self, FlowError> {
    let flows = Self {
      signup: signup_pipeline::build_signup_pipeline()?,
      signin: signin_pipeline::build_signin_pipeline()?,
      checkout: checkout_pipeline::build_checkout_pipeline()?,
      reconcile: reconcile_pipeline::build_reconcile_pipeline()?,
    };
    tracing::info!("Application pipelines built.");
    Ok(flows)
  }
}
