// tests/context_management_tests.rs
mod common;

use common::*;
use shopflow::{ContextData, Pipeline, Step, StepControl};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_context_data_is_shared_between_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::with_steps(
    "shared",
    [Step::required("write_first"), Step::required("read_then_write")],
  )
  .unwrap();

  pipeline
    .on("write_first", |ctx: ContextData<TestContext>| async move {
      let mut guard = ctx.write();
      guard.counter = 10;
      guard.message = "SetByFirst".to_string();
      Ok::<_, TestError>(StepControl::Continue)
    })
    .unwrap();

  pipeline
    .on("read_then_write", |ctx: ContextData<TestContext>| async move {
      let mut guard = ctx.write();
      assert_eq!(guard.counter, 10);
      guard.counter += 5;
      guard.message.push_str("_ThenSecond");
      Ok::<_, TestError>(StepControl::Continue)
    })
    .unwrap();

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.counter, 15);
  assert_eq!(guard.message, "SetByFirst_ThenSecond");
}

#[tokio::test]
#[serial]
async fn test_context_data_clone_shares_data() {
  setup_tracing();
  let original = ContextData::new(TestContext {
    counter: 1,
    ..Default::default()
  });
  let cloned = original.clone();

  original.write().counter = 5;
  assert_eq!(cloned.read().counter, 5);

  cloned.write().counter = 10;
  assert_eq!(original.read().counter, 10);
}

#[tokio::test]
#[serial]
async fn test_snapshot_is_detached_from_later_writes() {
  setup_tracing();
  let ctx = ContextData::new(TestContext::default());
  ctx.write().message = "before".to_string();

  let snapshot = ctx.snapshot();
  ctx.write().message = "after".to_string();

  assert_eq!(snapshot.message, "before");
  assert_eq!(ctx.read().message, "after");
}

#[test]
fn test_try_write_fails_while_read_guard_is_held() {
  let ctx = ContextData::new(TestContext::default());
  let guard = ctx.read();
  assert!(ctx.try_write().is_none());
  assert!(ctx.try_read().is_some());
  drop(guard);
  assert!(ctx.try_write().is_some());
}
