// tessera/src/validation/format.rs

use super::Validator;
use crate::error::ValidatorError;
use crate::messages::Violation;
use crate::options::Options;
use crate::value::Value;

/// `with` must match and `without` must not; both apply when both are given.
#[derive(Debug, Clone, Copy)]
pub struct Format;

impl Validator for Format {
  fn validate(&self, value: &Value, options: &Options) -> Result<(), ValidatorError> {
    let text = value.as_str();
    let with_ok = match options.get("with") {
      Some(Value::Regex(re)) => text.map_or(false, |text| re.is_match(text)),
      _ => true,
    };
    let without_ok = match options.get("without") {
      Some(Value::Regex(re)) => text.map_or(false, |text| !re.is_match(text)),
      _ => true,
    };
    if with_ok && without_ok {
      Ok(())
    } else {
      Err(Violation::new("format", "is an invalid format").into())
    }
  }

  fn check_options(&self, options: &Options) -> Result<(), String> {
    let mut given = 0;
    for key in ["with", "without"] {
      match options.get(key) {
        Some(Value::Regex(_)) => given += 1,
        Some(other) => return Err(format!("'{}' must be a pattern, got {}", key, other.inspect())),
        None => {}
      }
    }
    if given == 0 {
      return Err("expected 'with' and/or 'without'".to_string());
    }
    Ok(())
  }
}
