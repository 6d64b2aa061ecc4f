// tessera/src/registry.rs

//! Defines the `Registry`, a tag-keyed table of coercions and validators.
//!
//! A process-wide default lives behind `Registry::global()`. Schemas take a
//! snapshot of a registry when they are compiled, so later registrations never
//! change the behavior of an already compiled schema.

use crate::coercion::{self, Coercion};
use crate::error::{CoercionError, ValidatorError};
use crate::options::Options;
use crate::validation::{self, Validator};
use crate::value::Value;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

static GLOBAL: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
  Coercion,
  Validator,
}

#[derive(Clone)]
pub struct Registry {
  coercions: IndexMap<String, Arc<dyn Coercion>>,
  validators: IndexMap<String, Arc<dyn Validator>>,
}

impl Registry {
  /// A registry holding every built-in coercion and validator.
  pub fn new() -> Self {
    let mut registry = Self::empty();
    for (tag, coercion) in coercion::builtins() {
      registry.coercions.insert(tag.to_string(), coercion);
    }
    for (tag, validator) in validation::builtins() {
      registry.validators.insert(tag.to_string(), validator);
    }
    registry
  }

  pub fn empty() -> Self {
    Self {
      coercions: IndexMap::new(),
      validators: IndexMap::new(),
    }
  }

  /// The process-wide default. Schemas compiled without an explicit registry
  /// snapshot this one.
  pub fn global() -> &'static RwLock<Registry> {
    &GLOBAL
  }

  /// Registers (or replaces) a coercion under `tag`.
  pub fn register_coercion(&mut self, tag: impl Into<String>, coercion: impl Coercion + 'static) -> &mut Self {
    let tag = tag.into();
    event!(Level::DEBUG, %tag, "Registering coercion.");
    self.coercions.insert(tag, Arc::new(coercion));
    self
  }

  /// Registers (or replaces) a validator under `tag`.
  pub fn register_validator(&mut self, tag: impl Into<String>, validator: impl Validator + 'static) -> &mut Self {
    let tag = tag.into();
    event!(Level::DEBUG, %tag, "Registering validator.");
    self.validators.insert(tag, Arc::new(validator));
    self
  }

  /// Removes `tag`; returns whether it was registered.
  pub fn deregister(&mut self, kind: ExtensionKind, tag: &str) -> bool {
    let removed = match kind {
      ExtensionKind::Coercion => self.coercions.shift_remove(tag).is_some(),
      ExtensionKind::Validator => self.validators.shift_remove(tag).is_some(),
    };
    event!(Level::DEBUG, ?kind, %tag, removed, "Deregistering extension.");
    removed
  }

  pub fn coercion(&self, tag: &str) -> Option<Arc<dyn Coercion>> {
    self.coercions.get(tag).cloned()
  }

  pub fn validator(&self, tag: &str) -> Option<Arc<dyn Validator>> {
    self.validators.get(tag).cloned()
  }

  pub fn contains(&self, kind: ExtensionKind, tag: &str) -> bool {
    match kind {
      ExtensionKind::Coercion => self.coercions.contains_key(tag),
      ExtensionKind::Validator => self.validators.contains_key(tag),
    }
  }

  pub fn coercion_tags(&self) -> impl Iterator<Item = &str> {
    self.coercions.keys().map(String::as_str)
  }

  pub fn validator_tags(&self) -> impl Iterator<Item = &str> {
    self.validators.keys().map(String::as_str)
  }

  /// Coerces through the coercion registered under `tag`.
  pub fn coerce(&self, tag: &str, value: &Value, options: &Options) -> Result<Value, CoercionError> {
    match self.coercions.get(tag) {
      Some(coercion) => coercion.coerce(value, options),
      None => Err(anyhow::anyhow!("unknown coercion '{}'", tag).into()),
    }
  }

  /// Validates through the validator registered under `tag`.
  pub fn validate(&self, tag: &str, value: &Value, options: &Options) -> Result<(), ValidatorError> {
    match self.validators.get(tag) {
      Some(validator) => validator.validate(value, options),
      None => Err(anyhow::anyhow!("unknown validator '{}'", tag).into()),
    }
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry")
      .field("coercions", &self.coercions.keys().collect::<Vec<_>>())
      .field("validators", &self.validators.keys().collect::<Vec<_>>())
      .finish()
  }
}
