// tessera/src/validation/presence.rs

use super::Validator;
use crate::error::ValidatorError;
use crate::messages::Violation;
use crate::options::Options;
use crate::value::Value;

/// Rejects nil, empty collections and blank strings. `0` and `false` are present.
#[derive(Debug, Clone, Copy)]
pub struct Presence;

impl Validator for Presence {
  fn validate(&self, value: &Value, _options: &Options) -> Result<(), ValidatorError> {
    if value.is_blank() {
      return Err(Violation::new("presence", "cannot be empty").into());
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Absence;

impl Validator for Absence {
  fn validate(&self, value: &Value, _options: &Options) -> Result<(), ValidatorError> {
    if !value.is_blank() {
      return Err(Violation::new("absence", "must be empty").into());
    }
    Ok(())
  }
}
