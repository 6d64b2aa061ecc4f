// tessera/src/settings.rs

//! Message catalog settings, loaded from JSON.
//!
//! ```json
//! {
//!   "locale": "es",
//!   "messages": {
//!     "attributes": { "required": "es obligatorio" },
//!     "validators.length.min": "longitud mínima %{min}"
//!   }
//! }
//! ```
//!
//! Nested objects are flattened into dotted keys.

use crate::error::ConfigError;
use crate::messages::Translator;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use tracing::{event, Level};

const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
  #[serde(default = "default_locale")]
  pub locale: String,

  /// Translation key to message template.
  #[serde(default, deserialize_with = "flatten_catalog")]
  pub messages: IndexMap<String, String>,
}

fn default_locale() -> String {
  DEFAULT_LOCALE.to_string()
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      locale: default_locale(),
      messages: IndexMap::new(),
    }
  }
}

impl Settings {
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::SettingsParse { source })
  }

  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::SettingsIo {
      path: path.display().to_string(),
      source,
    })?;
    let settings = Self::from_json(&content)?;
    event!(Level::DEBUG, path = %path.display(), locale = %settings.locale, messages = settings.messages.len(), "Settings loaded.");
    Ok(settings)
  }

  pub fn with_message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
    self.messages.insert(key.into(), template.into());
    self
  }
}

impl Translator for Settings {
  fn translate(&self, key: &str) -> Option<String> {
    self.messages.get(key).cloned()
  }
}

fn flatten_catalog<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
  D: Deserializer<'de>,
{
  let tree = serde_json::Value::deserialize(deserializer)?;
  let mut catalog = IndexMap::new();
  flatten_into(&mut catalog, String::new(), tree).map_err(serde::de::Error::custom)?;
  Ok(catalog)
}

fn flatten_into(catalog: &mut IndexMap<String, String>, prefix: String, node: serde_json::Value) -> Result<(), String> {
  match node {
    serde_json::Value::Object(entries) => {
      for (key, child) in entries {
        let path = if prefix.is_empty() { key } else { format!("{}.{}", prefix, key) };
        flatten_into(catalog, path, child)?;
      }
      Ok(())
    }
    serde_json::Value::String(template) if !prefix.is_empty() => {
      catalog.insert(prefix, template);
      Ok(())
    }
    serde_json::Value::Null if prefix.is_empty() => Ok(()),
    other => Err(format!("message '{}' must be a string, got {}", prefix, other)),
  }
}
