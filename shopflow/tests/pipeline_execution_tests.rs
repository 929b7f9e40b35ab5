// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use shopflow::{ContextData, FlowOutcome, Pipeline, Step, StepControl};
use serial_test::serial;

fn three_steps() -> Pipeline<TestContext, TestError> {
  Pipeline::with_steps(
    "three_steps",
    [Step::required("step1"), Step::required("step2"), Step::required("step3")],
  )
  .unwrap()
}

#[tokio::test]
#[serial]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.on("step1", recording_handler("step1", " S1")).unwrap();
  pipeline.on("step2", recording_handler("step2", " S2")).unwrap();
  pipeline.on("step3", recording_handler("step3", " S3")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), FlowOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_stops_on_stop_signal() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.on("step1", recording_handler("step1", "A")).unwrap();
  pipeline
    .on("step2", |ctx: ContextData<TestContext>| async move {
      ctx.write().steps_executed.push("step2".to_string());
      Ok::<_, TestError>(StepControl::Stop)
    })
    .unwrap();
  pipeline.on("step3", recording_handler("step3", "C")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), FlowOutcome::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.message, "A");
  assert_eq!(guard.steps_executed, vec!["step1", "step2"]);
}

#[tokio::test]
#[serial]
async fn test_stop_in_before_phase_skips_on_and_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::with_steps("phases", [Step::required("only")]).unwrap();
  pipeline.before("only", recording_handler("before", "B")).unwrap();
  pipeline.on("only", recording_handler("on", "O")).unwrap();
  pipeline.after("only", recording_handler("after", "A")).unwrap();

  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("before".to_string()),
    ..Default::default()
  });
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), FlowOutcome::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["before"]);
}

#[tokio::test]
#[serial]
async fn test_phases_run_before_on_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::with_steps("phases", [Step::required("only")]).unwrap();
  // Registered out of order on purpose.
  pipeline.after("only", recording_handler("after", "A")).unwrap();
  pipeline.on("only", recording_handler("on", "O")).unwrap();
  pipeline.before("only", recording_handler("before", "B")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().message, "BOA");
}

#[tokio::test]
#[serial]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.on("step1", recording_handler("step1", "Good")).unwrap();
  pipeline.on("step2", failing_handler("step2", "gateway down")).unwrap();
  pipeline.on("step3", recording_handler("step3", "NeverRun")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap_err(), TestError::Handler("gateway down".to_string()));
  let guard = ctx.read();
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.steps_executed, vec!["step1", "step2"]);
}

#[tokio::test]
#[serial]
async fn test_skip_condition_is_evaluated_against_live_context() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::with_steps(
    "checkout_like",
    [
      Step::required("validate"),
      Step::required("simulate").skip_if(|ctx: &ContextData<TestContext>| ctx.read().gateway_configured),
      Step::required("charge").skip_if(|ctx: &ContextData<TestContext>| !ctx.read().gateway_configured),
      Step::required("persist"),
    ],
  )
  .unwrap();
  pipeline.on("validate", recording_handler("validate", "")).unwrap();
  pipeline.on("simulate", recording_handler("simulate", "")).unwrap();
  pipeline.on("charge", recording_handler("charge", "")).unwrap();
  pipeline.on("persist", recording_handler("persist", "")).unwrap();

  let mock = ContextData::new(TestContext::default());
  pipeline.run(mock.clone()).await.unwrap();
  assert_eq!(mock.read().steps_executed, vec!["validate", "simulate", "persist"]);

  let live = ContextData::new(TestContext {
    gateway_configured: true,
    ..Default::default()
  });
  pipeline.run(live.clone()).await.unwrap();
  assert_eq!(live.read().steps_executed, vec!["validate", "charge", "persist"]);
}

#[tokio::test]
#[serial]
async fn test_optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::with_steps(
    "optional",
    [Step::required("first"), Step::optional("notify"), Step::required("last")],
  )
  .unwrap();
  pipeline.on("first", recording_handler("first", "1")).unwrap();
  pipeline.on("last", recording_handler("last", "3")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().message, "13");
}

#[tokio::test]
#[serial]
async fn test_async_fn_items_can_be_registered() {
  setup_tracing();

  async fn bump(ctx: ContextData<TestContext>) -> Result<StepControl, TestError> {
    tokio::task::yield_now().await;
    ctx.write().counter += 10;
    Ok(StepControl::Continue)
  }

  let mut pipeline = Pipeline::<TestContext, TestError>::with_steps("fn_items", [Step::required("bump")]).unwrap();
  pipeline.on("bump", bump).unwrap();
  pipeline.on("bump", bump).unwrap();

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().counter, 20);
}

#[tokio::test]
#[serial]
async fn test_typed_phase_helpers_attach_async_fns() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::with_steps("typed", [Step::required("only")]).unwrap();
  assert_eq!(pipeline.name(), "typed");
  assert_eq!(pipeline.step_names(), vec!["only"]);

  pipeline
    .before("only", |ctx: ContextData<TestContext>| async move {
      ctx.write().message.push('b');
      Ok::<_, TestError>(StepControl::Continue)
    })
    .unwrap();
  pipeline
    .on("only", |ctx: ContextData<TestContext>| async move {
      ctx.write().message.push('o');
      Ok::<_, TestError>(StepControl::Continue)
    })
    .unwrap();
  pipeline
    .after("only", |ctx: ContextData<TestContext>| async move {
      ctx.write().message.push('a');
      Ok::<_, TestError>(StepControl::Continue)
    })
    .unwrap();

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().message, "boa");
}
