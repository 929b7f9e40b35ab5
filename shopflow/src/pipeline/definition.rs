// shopflow/src/pipeline/definition.rs

//! The `Pipeline<T, E>` type: step declarations plus the handlers attached to them.

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::core::step::Step;
use crate::error::FlowError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

pub type HandlerFuture<E> = Pin<Box<dyn Future<Output = Result<StepControl, E>> + Send>>;

/// A type-erased step handler.
///
/// Handlers receive a clone of the run's [`ContextData`] and must not hold a lock
/// guard across an `.await`.
pub type Handler<T, E> = Box<dyn Fn(ContextData<T>) -> HandlerFuture<E> + Send + Sync>;

/// The three phases of a step, executed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  pub(crate) const ALL: [Phase; 3] = [Phase::Before, Phase::On, Phase::After];
}

pub(crate) struct StepHandlers<T: Send + Sync + 'static, E> {
  before: Vec<Handler<T, E>>,
  on: Vec<Handler<T, E>>,
  after: Vec<Handler<T, E>>,
}

impl<T: Send + Sync + 'static, E> Default for StepHandlers<T, E> {
  fn default() -> Self {
    Self {
      before: Vec::new(),
      on: Vec::new(),
      after: Vec::new(),
    }
  }
}

impl<T: Send + Sync + 'static, E> StepHandlers<T, E> {
  pub(crate) fn phase(&self, phase: Phase) -> &[Handler<T, E>] {
    match phase {
      Phase::Before => &self.before,
      Phase::On => &self.on,
      Phase::After => &self.after,
    }
  }

  fn phase_mut(&mut self, phase: Phase) -> &mut Vec<Handler<T, E>> {
    match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    }
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.before.is_empty() && self.on.is_empty() && self.after.is_empty()
  }
}

/// An ordered set of named steps over the context type `T`.
///
/// Handlers return `Result<StepControl, E>`. Engine faults ([`FlowError`]) are
/// converted into `E`, which is why `E: From<FlowError>`.
pub struct Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<Step<T>>,
  pub(crate) handlers: HashMap<String, StepHandlers<T, E>>,
}

impl<T, E> Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      steps: Vec::new(),
      handlers: HashMap::new(),
    }
  }

  /// Builds a pipeline from step declarations, rejecting duplicate names.
  pub fn with_steps(name: impl Into<String>, steps: impl IntoIterator<Item = Step<T>>) -> Result<Self, FlowError> {
    let mut pipeline = Self::new(name);
    for step in steps {
      pipeline.push_step(step)?;
    }
    Ok(pipeline)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Appends a step at the end of the pipeline.
  pub fn push_step(&mut self, step: Step<T>) -> Result<(), FlowError> {
    if self.steps.iter().any(|s| s.name == step.name) {
      return Err(FlowError::DuplicateStep {
        pipeline: self.name.clone(),
        step: step.name,
      });
    }
    self.steps.push(step);
    Ok(())
  }

  pub fn before<F, Fut, HErr>(&mut self, step: &str, handler_fn: F) -> Result<(), FlowError>
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl, HErr>> + Send + 'static,
    HErr: Into<E> + 'static,
  {
    self.attach(step, Phase::Before, handler_fn)
  }

  pub fn on<F, Fut, HErr>(&mut self, step: &str, handler_fn: F) -> Result<(), FlowError>
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl, HErr>> + Send + 'static,
    HErr: Into<E> + 'static,
  {
    self.attach(step, Phase::On, handler_fn)
  }

  pub fn after<F, Fut, HErr>(&mut self, step: &str, handler_fn: F) -> Result<(), FlowError>
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl, HErr>> + Send + 'static,
    HErr: Into<E> + 'static,
  {
    self.attach(step, Phase::After, handler_fn)
  }

  fn attach<F, Fut, HErr>(&mut self, step: &str, phase: Phase, handler_fn: F) -> Result<(), FlowError>
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StepControl, HErr>> + Send + 'static,
    HErr: Into<E> + 'static,
  {
    self.ensure_step_exists(step)?;
    let handler: Handler<T, E> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self
      .handlers
      .entry(step.to_string())
      .or_default()
      .phase_mut(phase)
      .push(handler);
    Ok(())
  }

  fn ensure_step_exists(&self, step: &str) -> Result<(), FlowError> {
    if self.steps.iter().any(|s| s.name == step) {
      Ok(())
    } else {
      Err(FlowError::StepNotFound {
        pipeline: self.name.clone(),
        step: step.to_string(),
      })
    }
  }
}
