// tessera/src/validation/membership.rs

//! Inclusion and exclusion against an array (case-equality per element) or a range.

use super::Validator;
use crate::error::ValidatorError;
use crate::messages::Violation;
use crate::options::Options;
use crate::value::Value;

/// `in` takes precedence over `within` when both are given.
const COLLECTION_KEYS: [&str; 2] = ["in", "within"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Include,
  Exclude,
}

#[derive(Debug, Clone, Copy)]
pub struct Membership {
  mode: Mode,
}

impl Membership {
  pub fn inclusion() -> Self {
    Self { mode: Mode::Include }
  }

  pub fn exclusion() -> Self {
    Self { mode: Mode::Exclude }
  }

  fn tag(&self) -> &'static str {
    match self.mode {
      Mode::Include => "inclusion",
      Mode::Exclude => "exclusion",
    }
  }
}

impl Validator for Membership {
  fn validate(&self, value: &Value, options: &Options) -> Result<(), ValidatorError> {
    let violation = match options.first_of(&COLLECTION_KEYS) {
      Some(Value::Array(items)) => {
        let mut member = false;
        for item in items {
          if item.case_eq(value)? {
            member = true;
            break;
          }
        }
        if member == (self.mode == Mode::Include) {
          return Ok(());
        }
        let values: Vec<String> = items.iter().map(Value::inspect).collect();
        let template = match self.mode {
          Mode::Include => "must be one of: %{values}",
          Mode::Exclude => "must not be one of: %{values}",
        };
        Violation::new(format!("{}.of", self.tag()), template)
          .overridable_by("of_message")
          .var("values", values.join(", "))
      }
      Some(Value::Range(range)) => {
        if range.contains(value) == (self.mode == Mode::Include) {
          return Ok(());
        }
        let template = match self.mode {
          Mode::Include => "must be within %{min} and %{max}",
          Mode::Exclude => "must not be within %{min} and %{max}",
        };
        Violation::new(format!("{}.within", self.tag()), template)
          .overridable_by("within_message")
          .overridable_by("in_message")
          .var("min", &range.start)
          .var("max", range.last())
      }
      _ => return Err(anyhow::anyhow!("{} requires an 'in' array or range", self.tag()).into()),
    };
    Err(violation.into())
  }

  fn check_options(&self, options: &Options) -> Result<(), String> {
    match options.first_of(&COLLECTION_KEYS) {
      Some(Value::Array(_)) | Some(Value::Range(_)) => Ok(()),
      Some(other) => Err(format!("'in' must be an array or range, got {}", other.inspect())),
      None => Err("expected 'in' or 'within'".to_string()),
    }
  }
}
