// tessera/src/coercion/structured.rs

use crate::error::CoercionError;
use crate::options::Options;
use crate::value::{Map, Value};

/// Parses JSON text when it opens with the expected delimiter.
fn parse_json(text: &str, opener: char) -> Option<Value> {
  let trimmed = text.trim();
  if !trimmed.starts_with(opener) {
    return None;
  }
  serde_json::from_str::<serde_json::Value>(trimmed).ok().map(|json| Value::from(&json))
}

pub fn to_array(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  match value {
    Value::Array(_) => Ok(value.clone()),
    Value::Nil => Ok(Value::Array(Vec::new())),
    Value::String(s) if s.trim_start().starts_with('[') => match parse_json(s, '[') {
      Some(parsed @ Value::Array(_)) => Ok(parsed),
      _ => Err(CoercionError::Invalid),
    },
    Value::Hash(map) => Ok(Value::Array(
      map
        .iter()
        .map(|(k, v)| Value::Array(vec![Value::String(k.clone()), v.clone()]))
        .collect(),
    )),
    scalar => Ok(Value::Array(vec![scalar.clone()])),
  }
}

pub fn to_hash(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  match value {
    Value::Hash(_) => Ok(value.clone()),
    Value::Nil => Ok(Value::Hash(Map::new())),
    Value::String(s) => match parse_json(s, '{') {
      Some(parsed @ Value::Hash(_)) => Ok(parsed),
      _ => Err(CoercionError::Invalid),
    },
    Value::Array(items) => {
      let mut map = Map::new();
      for item in items {
        match item.as_array() {
          Some([key, val]) => {
            let key = key.as_str().map(str::to_string).unwrap_or_else(|| key.to_string());
            map.insert(key, val.clone());
          }
          _ => return Err(CoercionError::Invalid),
        }
      }
      Ok(Value::Hash(map))
    }
    _ => Err(CoercionError::Invalid),
  }
}
