// shopflow/src/lib.rs

//! Shopflow: named-step async pipelines.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step may carry
//! `before`, `on` and `after` handlers that operate on a shared
//! [`ContextData`] and answer with a [`StepControl`] signal. Steps can be
//! optional and can be skipped by a predicate evaluated against the context.
//!
//! StreamShop uses these pipelines for checkout and for webhook-driven
//! payment reconciliation, where each stage (validate, call the gateway, map
//! the result, persist) is a separately logged step.

pub mod core;
pub mod error;
pub mod pipeline;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{FlowOutcome, StepControl};
pub use crate::core::step::Step;
pub use crate::error::FlowError;
pub use crate::pipeline::definition::{Handler, Pipeline};
