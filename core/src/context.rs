// tessera/src/context.rs

use crate::value::{Map, Value};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// The key/value bundle a task runs against: raw attribute input on the way
/// in, business results on the way out.
///
/// Clones share the same underlying map. Guards are blocking and MUST NOT be
/// held across `.await` points.
#[derive(Debug, Clone, Default)]
pub struct Context(Arc<RwLock<Map>>);

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_map(map: Map) -> Self {
    Context(Arc::new(RwLock::new(map)))
  }

  /// Builder-style insert.
  pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.set(key, value);
    self
  }

  pub fn get(&self, key: &str) -> Option<Value> {
    self.0.read().get(key).cloned()
  }

  pub fn contains(&self, key: &str) -> bool {
    self.0.read().contains_key(key)
  }

  /// Returns the previous value, if any.
  pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.0.write().insert(key.into(), value.into())
  }

  pub fn remove(&self, key: &str) -> Option<Value> {
    self.0.write().shift_remove(key)
  }

  /// A detached copy of the current contents.
  pub fn snapshot(&self) -> Map {
    self.0.read().clone()
  }

  pub fn read(&self) -> RwLockReadGuard<'_, Map> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, Map> {
    self.0.write()
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Context::from_map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}
