// tessera/src/validation/mod.rs

//! Validators check post-coercion values. Each is registered under a tag and
//! receives the option bag declared with it.
//!
//! The generic options (`allow_nil`, `if`, `unless`, `message`) are handled by
//! the resolver; validators only interpret their own keys and name the
//! override options (`min_message`, ...) on the violations they raise.

pub mod bounds;
pub mod custom;
pub mod format;
pub mod membership;
pub mod presence;

use crate::error::ValidatorError;
use crate::options::Options;
use crate::value::Value;
use std::sync::Arc;

pub trait Validator: Send + Sync {
  fn validate(&self, value: &Value, options: &Options) -> Result<(), ValidatorError>;

  /// Checked once when a schema is compiled. An `Err` carries the reason and
  /// becomes `ConfigError::InvalidOptions`.
  fn check_options(&self, _options: &Options) -> Result<(), String> {
    Ok(())
  }
}

impl<F> Validator for F
where
  F: Fn(&Value, &Options) -> Result<(), ValidatorError> + Send + Sync,
{
  fn validate(&self, value: &Value, options: &Options) -> Result<(), ValidatorError> {
    self(value, options)
  }
}

pub(crate) fn builtins() -> Vec<(&'static str, Arc<dyn Validator>)> {
  vec![
    ("absence", Arc::new(presence::Absence) as Arc<dyn Validator>),
    ("custom", Arc::new(custom::Custom)),
    ("exclusion", Arc::new(membership::Membership::exclusion())),
    ("format", Arc::new(format::Format)),
    ("inclusion", Arc::new(membership::Membership::inclusion())),
    ("length", Arc::new(bounds::Bounds::length())),
    ("numeric", Arc::new(bounds::Bounds::numeric())),
    ("presence", Arc::new(presence::Presence)),
  ]
}
