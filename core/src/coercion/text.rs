// tessera/src/coercion/text.rs

use crate::error::CoercionError;
use crate::options::Options;
use crate::value::Value;

const TRUTHY: [&str; 3] = ["true", "yes", "1"];
const FALSY: [&str; 3] = ["false", "no", "0"];

pub fn to_boolean(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  let text = match value {
    Value::Bool(b) => return Ok(Value::Bool(*b)),
    Value::String(_) | Value::Symbol(_) | Value::Integer(_) => value.to_string().trim().to_ascii_lowercase(),
    _ => return Err(CoercionError::Invalid),
  };
  if TRUTHY.contains(&text.as_str()) {
    Ok(Value::Bool(true))
  } else if FALSY.contains(&text.as_str()) {
    Ok(Value::Bool(false))
  } else {
    Err(CoercionError::Invalid)
  }
}

pub fn to_string(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  match value {
    Value::String(_) => Ok(value.clone()),
    Value::Array(_) | Value::Hash(_) | Value::Proc(_) | Value::Record(_) | Value::Kind(_) => Err(CoercionError::Invalid),
    other => Ok(Value::String(other.to_string())),
  }
}

pub fn to_symbol(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  match value {
    Value::Symbol(_) => Ok(value.clone()),
    Value::String(s) if !s.is_empty() => Ok(Value::Symbol(s.clone())),
    _ => Err(CoercionError::Invalid),
  }
}
