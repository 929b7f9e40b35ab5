// shopflow/src/core/control.rs

//! Signals exchanged between handlers and the pipeline runner.

/// What a handler wants the runner to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Run the remaining handlers of this step, then the following steps.
  Continue,
  /// Halt the run. Nothing after the current handler executes.
  Stop,
}

/// How a pipeline run ended when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step was executed or skipped.
  Completed,
  /// A handler answered [`StepControl::Stop`].
  Stopped,
}
