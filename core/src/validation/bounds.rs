// tessera/src/validation/bounds.rs

//! Length and numeric bounds. Both accept exactly one constraint group:
//! `within`/`in`, `not_within`/`not_in`, `min` and/or `max`, `is`, `is_not`.

use super::Validator;
use crate::error::ValidatorError;
use crate::messages::Violation;
use crate::options::Options;
use crate::value::{Range, Value};

const WITHIN: [&str; 2] = ["within", "in"];
const NOT_WITHIN: [&str; 2] = ["not_within", "not_in"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
  Length,
  Numeric,
}

enum Constraint<'a> {
  Within(&'a Range),
  NotWithin(&'a Range),
  MinMax(Option<f64>, Option<f64>),
  Is(f64),
  IsNot(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct Bounds {
  measure: Measure,
}

impl Bounds {
  pub fn length() -> Self {
    Self { measure: Measure::Length }
  }

  pub fn numeric() -> Self {
    Self { measure: Measure::Numeric }
  }

  fn tag(&self) -> &'static str {
    match self.measure {
      Measure::Length => "length",
      Measure::Numeric => "numeric",
    }
  }

  fn constraint<'a>(&self, options: &'a Options) -> Result<Constraint<'a>, String> {
    let number = move |key: &str| -> Result<Option<f64>, String> {
      match options.get(key) {
        None => Ok(None),
        Some(value) => value
          .as_f64()
          .map(Some)
          .ok_or_else(|| format!("'{}' must be numeric, got {}", key, value.inspect())),
      }
    };
    let range = move |keys: &[&str]| -> Result<Option<&'a Range>, String> {
      match options.first_of(keys) {
        None => Ok(None),
        Some(Value::Range(range)) => Ok(Some(range)),
        Some(other) => Err(format!("'{}' must be a range, got {}", keys[0], other.inspect())),
      }
    };

    let within = range(&WITHIN)?;
    let not_within = range(&NOT_WITHIN)?;
    let (min, max) = (number("min")?, number("max")?);
    let (is, is_not) = (number("is")?, number("is_not")?);

    let groups = [
      within.is_some(),
      not_within.is_some(),
      min.is_some() || max.is_some(),
      is.is_some(),
      is_not.is_some(),
    ];
    if groups.iter().filter(|given| **given).count() != 1 {
      return Err(format!("unknown {} validator options given", self.tag()));
    }

    Ok(match (within, not_within, is, is_not) {
      (Some(range), _, _, _) => Constraint::Within(range),
      (_, Some(range), _, _) => Constraint::NotWithin(range),
      (_, _, Some(is), _) => Constraint::Is(is),
      (_, _, _, Some(is_not)) => Constraint::IsNot(is_not),
      _ => Constraint::MinMax(min, max),
    })
  }

  fn violation(&self, variant: &str, template: &str) -> Violation {
    let template = match self.measure {
      Measure::Length => format!("length {}", template),
      Measure::Numeric => template.to_string(),
    };
    Violation::new(format!("{}.{}", self.tag(), variant), template).overridable_by(format!("{}_message", variant))
  }
}

/// Renders bounds the way they were declared: `18`, not `18.0`.
fn display(bound: f64) -> String {
  if bound.fract() == 0.0 && bound.abs() < 1e15 {
    format!("{}", bound as i64)
  } else {
    bound.to_string()
  }
}

impl Validator for Bounds {
  fn validate(&self, value: &Value, options: &Options) -> Result<(), ValidatorError> {
    let constraint = self.constraint(options).map_err(|message| anyhow::anyhow!(message))?;
    let measured = match self.measure {
      Measure::Length => value.length().map(|len| Value::Integer(len as i64)),
      Measure::Numeric if value.is_numeric() => Some(value.clone()),
      Measure::Numeric => None,
    };
    let number = measured.as_ref().and_then(Value::as_f64);

    let violation = match constraint {
      Constraint::Within(range) => {
        if measured.as_ref().map_or(false, |m| range.contains(m)) {
          return Ok(());
        }
        self
          .violation("within", "must be within %{min} and %{max}")
          .overridable_by("in_message")
          .var("min", &range.start)
          .var("max", range.last())
      }
      Constraint::NotWithin(range) => {
        if measured.as_ref().map_or(false, |m| !range.contains(m)) {
          return Ok(());
        }
        self
          .violation("not_within", "must not be within %{min} and %{max}")
          .overridable_by("not_in_message")
          .var("min", &range.start)
          .var("max", range.last())
      }
      Constraint::MinMax(min, max) => {
        if let Some(min) = min {
          if number.map_or(true, |n| n < min) {
            return Err(self.violation("min", "must be at least %{min}").var("min", display(min)).into());
          }
        }
        if let Some(max) = max {
          if number.map_or(true, |n| n > max) {
            return Err(self.violation("max", "must be at most %{max}").var("max", display(max)).into());
          }
        }
        return Ok(());
      }
      Constraint::Is(is) => {
        if number == Some(is) {
          return Ok(());
        }
        self.violation("is", "must be %{is}").var("is", display(is))
      }
      Constraint::IsNot(is_not) => {
        if number.map_or(false, |n| n != is_not) {
          return Ok(());
        }
        self.violation("is_not", "must not be %{is_not}").var("is_not", display(is_not))
      }
    };
    Err(violation.into())
  }

  fn check_options(&self, options: &Options) -> Result<(), String> {
    self.constraint(options).map(|_| ())
  }
}
