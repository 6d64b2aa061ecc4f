// tessera/src/options.rs

//! Option bags handed to coercions and validators.

use crate::value::Value;
use indexmap::IndexMap;

/// An ordered `key -> Value` bag. Keys mirror the declaration keywords
/// (`with`, `in`, `min`, `allow_nil`, `message`, ...).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options(IndexMap<String, Value>);

impl Options {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert.
  pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.0.insert(key.into(), value.into());
    self
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    self.0.insert(key.into(), value.into());
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// First present key wins, so `first_of(&["in", "within"])` prefers `in`.
  pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
    keys.iter().find_map(|key| self.0.get(*key))
  }

  pub fn contains(&self, key: &str) -> bool {
    self.0.contains_key(key)
  }

  pub fn flag(&self, key: &str) -> bool {
    self.0.get(key).map_or(false, Value::truthy)
  }

  pub fn str(&self, key: &str) -> Option<&str> {
    self.0.get(key).and_then(Value::as_str)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Options(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}
