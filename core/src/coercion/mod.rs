// tessera/src/coercion/mod.rs

//! Coercions convert raw input into a typed `Value`. Each is registered under a
//! type tag; attributes name the tags they accept, tried in declaration order.

pub mod numeric;
pub mod structured;
pub mod temporal;
pub mod text;

use crate::error::CoercionError;
use crate::options::Options;
use crate::value::Value;
use std::sync::Arc;

pub trait Coercion: Send + Sync {
  /// Returns `CoercionError::Invalid` when `value` has no representation in the
  /// target type. Any other error is treated as a bug and propagates.
  fn coerce(&self, value: &Value, options: &Options) -> Result<Value, CoercionError>;
}

impl<F> Coercion for F
where
  F: Fn(&Value, &Options) -> Result<Value, CoercionError> + Send + Sync,
{
  fn coerce(&self, value: &Value, options: &Options) -> Result<Value, CoercionError> {
    self(value, options)
  }
}

/// The built-in tags, in registration order.
pub(crate) fn builtins() -> Vec<(&'static str, Arc<dyn Coercion>)> {
  vec![
    ("array", Arc::new(structured::to_array) as Arc<dyn Coercion>),
    ("big_decimal", Arc::new(numeric::to_big_decimal)),
    ("boolean", Arc::new(text::to_boolean)),
    ("complex", Arc::new(numeric::to_complex)),
    ("date", Arc::new(temporal::to_date)),
    ("datetime", Arc::new(temporal::to_datetime)),
    ("float", Arc::new(numeric::to_float)),
    ("hash", Arc::new(structured::to_hash)),
    ("integer", Arc::new(numeric::to_integer)),
    ("rational", Arc::new(numeric::to_rational)),
    ("string", Arc::new(text::to_string)),
    ("symbol", Arc::new(text::to_symbol)),
    ("time", Arc::new(temporal::to_time)),
  ]
}
