// tessera/src/task/mod.rs

//! A minimal task runtime around the resolver: resolve the attributes, halt
//! with the validation report when they are invalid, otherwise run the work.

pub mod control;
pub mod outcome;

pub use control::Control;
pub use outcome::{Outcome, State, Status};

use crate::context::Context;
use crate::error::TaskError;
use crate::schema::Schema;
use crate::value::{Map, Value};

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// What the work of a task sees: the shared context and the resolved attributes.
#[derive(Debug, Clone)]
pub struct Execution {
  context: Context,
  attributes: Arc<Map>,
}

impl Execution {
  pub fn context(&self) -> &Context {
    &self.context
  }

  /// The value bound under `accessor`.
  pub fn get(&self, accessor: &str) -> Option<&Value> {
    self.attributes.get(accessor)
  }

  pub fn attributes(&self) -> &Map {
    &self.attributes
  }
}

/// The business logic of a task.
#[async_trait]
pub trait Work: Send + Sync {
  async fn perform(&self, execution: Execution) -> anyhow::Result<Control>;
}

/// Adapts an async closure into `Work`.
pub struct FnWork<F>(F);

#[async_trait]
impl<F, Fut> Work for FnWork<F>
where
  F: Fn(Execution) -> Fut + Send + Sync,
  Fut: Future<Output = anyhow::Result<Control>> + Send,
{
  async fn perform(&self, execution: Execution) -> anyhow::Result<Control> {
    (self.0)(execution).await
  }
}

pub fn work_fn<F, Fut>(f: F) -> FnWork<F>
where
  F: Fn(Execution) -> Fut + Send + Sync,
  Fut: Future<Output = anyhow::Result<Control>> + Send,
{
  FnWork(f)
}

pub struct Task {
  name: String,
  schema: Arc<Schema>,
  work: Arc<dyn Work>,
}

impl Task {
  pub fn new(name: impl Into<String>, schema: Arc<Schema>, work: impl Work + 'static) -> Self {
    Self {
      name: name.into(),
      schema,
      work: Arc::new(work),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn schema(&self) -> &Arc<Schema> {
    &self.schema
  }

  /// Runs the task against `context`.
  ///
  /// Invalid attributes interrupt the outcome before the work runs. Errors are
  /// only returned for configuration problems and extension failures.
  #[instrument(name = "Task::run", skip_all, fields(task = %self.name), err(Display))]
  pub async fn run(&self, context: Context) -> Result<Outcome, TaskError> {
    let mut outcome = Outcome::new(&self.name);
    outcome.executing()?;

    let resolution = self.schema.resolve(&context)?;
    if !resolution.is_valid() {
      let report = resolution.report();
      event!(Level::INFO, reason = %report.full_message, "Task halted by invalid attributes.");
      let metadata = serde_json::to_value(&report)?;
      outcome.fail(report.full_message, Some(metadata))?;
      return Ok(outcome);
    }

    let execution = Execution {
      context,
      attributes: Arc::new(resolution.into_values()),
    };
    event!(Level::DEBUG, "Attributes resolved, performing work.");
    match self.work.perform(execution).await {
      Ok(Control::Continue) => outcome.complete()?,
      Ok(Control::Skip(reason)) => {
        event!(Level::INFO, %reason, "Task skipped.");
        outcome.skip(reason)?
      }
      Ok(Control::Fail(reason)) => {
        event!(Level::INFO, %reason, "Task failed.");
        outcome.fail(reason, None)?
      }
      Err(error) => {
        event!(Level::ERROR, error = %error, "Task work raised.");
        outcome.fail(error.to_string(), None)?
      }
    }
    Ok(outcome)
  }
}

impl fmt::Debug for Task {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Task")
      .field("name", &self.name)
      .field("schema", &self.schema)
      .finish()
  }
}
