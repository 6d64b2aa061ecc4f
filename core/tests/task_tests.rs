// tests/task_tests.rs
mod common;

use common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tessera::{
  work_fn, AttributeSet, Context, Control, Execution, Options, Outcome, ResolveError, Source, State, Status, Task,
  TaskError, Value, Work,
};

fn signup_schema() -> Arc<tessera::Schema> {
  Arc::new(compile(
    AttributeSet::new()
      .required("email", |a| a.format(Options::new().set("with", Value::pattern("@").unwrap())))
      .required("age", |a| a.of_type("integer").numeric(Options::new().set("min", 18))),
  ))
}

#[tokio::test]
async fn test_valid_task_runs_work() {
  setup_tracing();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  let task = Task::new(
    "signup",
    signup_schema(),
    work_fn(move |execution: Execution| {
      let counter = counter.clone();
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        let age = execution.get("age").and_then(Value::as_i64).unwrap_or_default();
        execution.context().set("greeting", format!("welcome, {}", age));
        Ok::<_, anyhow::Error>(Control::Continue)
      }
    }),
  );

  let context = Context::new().with("email", "ann@example.com").with("age", "30");
  let outcome = task.run(context.clone()).await.unwrap();

  assert_eq!(outcome.state(), State::Complete);
  assert_eq!(outcome.status(), Status::Success);
  assert!(outcome.is_success());
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert_eq!(context.get("greeting"), Some(Value::from("welcome, 30")));
}

#[tokio::test]
async fn test_invalid_attributes_halt_before_work() {
  setup_tracing();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  let task = Task::new(
    "signup",
    signup_schema(),
    work_fn(move |_execution: Execution| {
      let counter = counter.clone();
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, anyhow::Error>(Control::Continue)
      }
    }),
  );

  let outcome = task.run(Context::new().with("email", "bob").with("age", "12")).await.unwrap();

  assert_eq!(calls.load(Ordering::SeqCst), 0);
  assert_eq!(outcome.state(), State::Interrupted);
  assert!(outcome.is_failed());
  assert_eq!(
    outcome.reason(),
    Some("email is an invalid format. age must be at least 18.")
  );
  assert_eq!(
    outcome.metadata(),
    &serde_json::json!({
      "messages": {
        "email": ["is an invalid format"],
        "age": ["must be at least 18"]
      },
      "full_message": "email is an invalid format. age must be at least 18."
    })
  );
}

struct Archive;

#[async_trait::async_trait]
impl Work for Archive {
  async fn perform(&self, execution: Execution) -> anyhow::Result<Control> {
    match execution.get("mode").and_then(Value::as_str) {
      Some("skip") => Ok(Control::Skip("nothing to archive".to_string())),
      Some("fail") => Ok(Control::Fail("archive is locked".to_string())),
      Some("raise") => Err(anyhow::anyhow!("storage unavailable")),
      _ => Ok(Control::Continue),
    }
  }
}

#[tokio::test]
async fn test_work_signals_map_to_outcomes() {
  setup_tracing();
  let task = Task::new("archive", Arc::new(compile(AttributeSet::new().required("mode", |a| a))), Archive);

  let skipped = task.run(Context::new().with("mode", "skip")).await.unwrap();
  assert_eq!((skipped.state(), skipped.status()), (State::Interrupted, Status::Skipped));
  assert_eq!(skipped.reason(), Some("nothing to archive"));

  let failed = task.run(Context::new().with("mode", "fail")).await.unwrap();
  assert_eq!((failed.state(), failed.status()), (State::Interrupted, Status::Failed));
  assert_eq!(failed.reason(), Some("archive is locked"));

  let raised = task.run(Context::new().with("mode", "raise")).await.unwrap();
  assert!(raised.is_failed());
  assert_eq!(raised.reason(), Some("storage unavailable"));

  let done = task.run(Context::new().with("mode", "go")).await.unwrap();
  assert!(done.is_complete());
  assert_eq!(done.task(), "archive");
}

#[tokio::test]
async fn test_extension_errors_propagate_from_run() {
  setup_tracing();
  let schema = Arc::new(compile(AttributeSet::new().required("token", |a| {
    a.source(Source::callable(|_scope| Err(anyhow::anyhow!("vault offline").into())))
  })));
  let task = Task::new("rotate", schema, Archive);

  let err = task.run(Context::new()).await.unwrap_err();
  assert!(matches!(err, TaskError::Resolve(ResolveError::Extension { .. })));
}

#[tokio::test]
async fn test_concurrent_runs_share_one_schema() {
  setup_tracing();
  let task = Arc::new(Task::new(
    "archive",
    Arc::new(compile(AttributeSet::new().required("mode", |a| a))),
    Archive,
  ));

  let mut handles = Vec::new();
  for mode in ["go", "skip", "fail"] {
    let task = task.clone();
    handles.push(tokio::spawn(async move { task.run(Context::new().with("mode", mode)).await }));
  }
  let mut statuses = Vec::new();
  for handle in handles {
    statuses.push(handle.await.unwrap().unwrap().status());
  }
  assert_eq!(statuses, vec![Status::Success, Status::Skipped, Status::Failed]);
}

#[test]
fn test_outcome_rejects_illegal_transitions() {
  let mut outcome = Outcome::new("manual");
  assert!(matches!(outcome.complete(), Err(TaskError::InvalidTransition { .. })));

  outcome.executing().unwrap();
  outcome.complete().unwrap();
  match outcome.skip("late") {
    Err(TaskError::InvalidTransition { from, to }) => {
      assert_eq!(from, "complete");
      assert_eq!(to, "interrupted");
    }
    other => panic!("Expected InvalidTransition, got {:?}", other),
  }
  assert_eq!(outcome.status(), Status::Success);
}
