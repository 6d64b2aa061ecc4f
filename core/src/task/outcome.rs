// tessera/src/task/outcome.rs

use crate::error::TaskError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
  Initialized,
  Executing,
  Complete,
  Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  Success,
  Skipped,
  Failed,
}

impl fmt::Display for State {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      State::Initialized => "initialized",
      State::Executing => "executing",
      State::Complete => "complete",
      State::Interrupted => "interrupted",
    })
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Status::Success => "success",
      Status::Skipped => "skipped",
      Status::Failed => "failed",
    })
  }
}

/// The result of one task run.
///
/// `initialized -> executing -> complete | interrupted`. Status stays
/// `success` unless the run is interrupted by a skip or a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
  task: String,
  state: State,
  status: Status,
  reason: Option<String>,
  metadata: serde_json::Value,
}

impl Outcome {
  pub fn new(task: impl Into<String>) -> Self {
    Self {
      task: task.into(),
      state: State::Initialized,
      status: Status::Success,
      reason: None,
      metadata: serde_json::Value::Object(serde_json::Map::new()),
    }
  }

  pub fn task(&self) -> &str {
    &self.task
  }

  pub fn state(&self) -> State {
    self.state
  }

  pub fn status(&self) -> Status {
    self.status
  }

  pub fn reason(&self) -> Option<&str> {
    self.reason.as_deref()
  }

  /// For validation failures: `{"messages": {...}, "full_message": "..."}`.
  pub fn metadata(&self) -> &serde_json::Value {
    &self.metadata
  }

  pub fn is_success(&self) -> bool {
    self.status == Status::Success
  }

  pub fn is_skipped(&self) -> bool {
    self.status == Status::Skipped
  }

  pub fn is_failed(&self) -> bool {
    self.status == Status::Failed
  }

  pub fn is_complete(&self) -> bool {
    self.state == State::Complete
  }

  pub fn is_interrupted(&self) -> bool {
    self.state == State::Interrupted
  }

  pub fn executing(&mut self) -> Result<(), TaskError> {
    self.transition(State::Initialized, State::Executing)
  }

  pub fn complete(&mut self) -> Result<(), TaskError> {
    self.transition(State::Executing, State::Complete)
  }

  pub fn skip(&mut self, reason: impl Into<String>) -> Result<(), TaskError> {
    self.interrupt(Status::Skipped, reason.into(), None)
  }

  pub fn fail(&mut self, reason: impl Into<String>, metadata: Option<serde_json::Value>) -> Result<(), TaskError> {
    self.interrupt(Status::Failed, reason.into(), metadata)
  }

  fn interrupt(&mut self, status: Status, reason: String, metadata: Option<serde_json::Value>) -> Result<(), TaskError> {
    self.transition(State::Executing, State::Interrupted)?;
    self.status = status;
    self.reason = Some(reason);
    if let Some(metadata) = metadata {
      self.metadata = metadata;
    }
    Ok(())
  }

  fn transition(&mut self, expected: State, to: State) -> Result<(), TaskError> {
    if self.state != expected {
      return Err(TaskError::InvalidTransition {
        from: self.state.to_string(),
        to: to.to_string(),
      });
    }
    self.state = to;
    Ok(())
  }
}
