// tessera/src/validation/custom.rs

use super::Validator;
use crate::error::ValidatorError;
use crate::messages::Violation;
use crate::options::Options;
use crate::value::Value;

/// Delegates to the predicate held in the `validator` option. A predicate that
/// errors is a bug in the predicate and propagates instead of failing validation.
#[derive(Debug, Clone, Copy)]
pub struct Custom;

impl Validator for Custom {
  fn validate(&self, value: &Value, options: &Options) -> Result<(), ValidatorError> {
    let Some(Value::Proc(predicate)) = options.get("validator") else {
      return Err(anyhow::anyhow!("custom validation requires a 'validator' predicate").into());
    };
    if predicate.call(value)? {
      Ok(())
    } else {
      Err(Violation::new("custom", "is not valid").into())
    }
  }

  fn check_options(&self, options: &Options) -> Result<(), String> {
    match options.get("validator") {
      Some(Value::Proc(_)) => Ok(()),
      Some(other) => Err(format!("'validator' must be a predicate, got {}", other.inspect())),
      None => Err("expected a 'validator' predicate".to_string()),
    }
  }
}
