// shopflow/src/error.rs
use thiserror::Error;

/// Faults raised by the engine itself, as opposed to errors returned by handlers.
///
/// A pipeline's error type must implement `From<FlowError>` so that these can be
/// surfaced through the same `Result` as handler failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
  #[error("pipeline '{pipeline}' has no step named '{step}'")]
  StepNotFound { pipeline: String, step: String },

  #[error("pipeline '{pipeline}' already defines a step named '{step}'")]
  DuplicateStep { pipeline: String, step: String },

  #[error("required step '{step}' of pipeline '{pipeline}' has no handlers")]
  HandlerMissing { pipeline: String, step: String },
}
