// tessera/src/task/control.rs

//! Signals returned by task work.

/// How the work of a task finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
  /// The work ran to completion.
  Continue,
  /// The work decided there was nothing to do. The outcome is interrupted
  /// with status skipped.
  Skip(String),
  /// The work hit an expected business failure. The outcome is interrupted
  /// with status failed.
  Fail(String),
}
