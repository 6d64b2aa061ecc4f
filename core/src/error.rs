// tessera/src/error.rs
use anyhow::Error as AnyhowError;
use std::fmt;
use thiserror::Error;

use crate::messages::Violation;

/// Structural misconfiguration. Raised while compiling a schema or loading
/// settings, never while resolving data.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Attribute names must not be empty")]
  EmptyName,

  #[error("Accessor '{accessor}' is declared more than once")]
  DuplicateAccessor { accessor: String },

  #[error("Accessor '{accessor}' collides with a method of the same name")]
  AccessorShadowsMethod { accessor: String },

  #[error("Unknown coercion '{tag}' for attribute '{attribute}'")]
  UnknownCoercion { attribute: String, tag: String },

  #[error("Unknown validator '{tag}' for attribute '{attribute}'")]
  UnknownValidator { attribute: String, tag: String },

  #[error("Invalid {validator} options for attribute '{attribute}': {message}")]
  InvalidOptions {
    attribute: String,
    validator: String,
    message: String,
  },

  #[error("Attribute '{attribute}' references undefined method '{method}'")]
  UndefinedMethod { attribute: String, method: String },

  #[error("Cannot derive a {affix} for attribute '{attribute}' from its source")]
  UnderivableAffix { attribute: String, affix: &'static str },

  #[error("Invalid pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: regex::Error,
  },

  #[error("Failed to read settings from '{path}': {source}")]
  SettingsIo {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse settings: {source}")]
  SettingsParse {
    #[source]
    source: serde_json::Error,
  },
}

/// Where an extension failure was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Condition,
  Source,
  Default,
  Coercion,
  Validation,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Condition => "condition",
      Stage::Source => "source",
      Stage::Default => "default",
      Stage::Coercion => "coercion",
      Stage::Validation => "validation",
    };
    f.write_str(name)
  }
}

/// Errors escaping a resolution. Data failures never appear here; they land
/// in the validation report.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("The {stage} of attribute '{attribute}' raised: {source}")]
  Extension {
    attribute: String,
    stage: Stage,
    #[source]
    source: AnyhowError,
  },
}

/// Returned by sources (methods, callables, delegates).
#[derive(Debug, Error)]
pub enum SourceError {
  /// The source cannot provide the value. Reported as a data failure.
  #[error("source is not accessible")]
  Unreachable,

  #[error(transparent)]
  Failed(#[from] AnyhowError),
}

/// Returned by coercions.
#[derive(Debug, Error)]
pub enum CoercionError {
  /// The input has no representation in the target type. Reported as a data failure.
  #[error("value cannot be coerced")]
  Invalid,

  #[error(transparent)]
  Unexpected(#[from] AnyhowError),
}

/// Returned by validators.
#[derive(Debug, Error)]
pub enum ValidatorError {
  /// The value broke the rule. Reported as a data failure.
  #[error("{0}")]
  Invalid(Violation),

  #[error(transparent)]
  Unexpected(#[from] AnyhowError),
}

impl From<Violation> for ValidatorError {
  fn from(violation: Violation) -> Self {
    ValidatorError::Invalid(violation)
  }
}

/// Errors from the task runtime.
#[derive(Debug, Error)]
pub enum TaskError {
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error("Invalid outcome transition from {from} to {to}")]
  InvalidTransition { from: String, to: String },

  #[error("Failed to serialize the validation report: {0}")]
  Report(#[from] serde_json::Error),
}

pub type TesseraResult<T, E = ResolveError> = std::result::Result<T, E>;
