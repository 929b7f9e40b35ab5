// shopflow/src/pipeline/execution.rs

//! `Pipeline::run()`: walks the steps in order and drives their handlers.

use crate::core::context_data::ContextData;
use crate::core::control::{FlowOutcome, StepControl};
use crate::core::step::Step;
use crate::error::FlowError;
use crate::pipeline::definition::{Phase, Pipeline};
use tracing::{debug, error, info, info_span, instrument, trace, Instrument};

impl<T, E> Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Executes the pipeline against `ctx`.
  ///
  /// Returns `Completed` when every step ran or was skipped, `Stopped` when a
  /// handler asked to stop, and the first handler error otherwise. A required
  /// step with no handlers fails the run with [`FlowError::HandlerMissing`].
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(pipeline = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx: ContextData<T>) -> Result<FlowOutcome, E> {
    debug!("Pipeline run starting.");

    for (index, step) in self.steps.iter().enumerate() {
      let span = info_span!("flow_step", step = %step.name, index, optional = step.optional);
      if self.run_step(step, ctx.clone()).instrument(span).await? == StepControl::Stop {
        info!(step = %step.name, "Pipeline stopped by a handler.");
        return Ok(FlowOutcome::Stopped);
      }
    }

    debug!("Pipeline run completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_step(&self, step: &Step<T>, ctx: ContextData<T>) -> Result<StepControl, E> {
    if let Some(skip) = &step.skip_if {
      if skip(&ctx) {
        debug!("Step skipped by its condition.");
        return Ok(StepControl::Continue);
      }
    }

    let handlers = match self.handlers.get(&step.name).filter(|h| !h.is_empty()) {
      Some(handlers) => handlers,
      None if step.optional => {
        debug!("Optional step has no handlers, skipping.");
        return Ok(StepControl::Continue);
      }
      None => {
        error!("Required step has no handlers.");
        return Err(E::from(FlowError::HandlerMissing {
          pipeline: self.name.clone(),
          step: step.name.clone(),
        }));
      }
    };

    for phase in Phase::ALL {
      for (handler_index, handler) in handlers.phase(phase).iter().enumerate() {
        trace!(?phase, handler_index, "Running handler.");
        match handler(ctx.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => return Ok(StepControl::Stop),
          Err(e) => {
            error!(?phase, handler_index, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }

    Ok(StepControl::Continue)
  }
}
