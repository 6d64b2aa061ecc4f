// tessera/src/resolver/scope.rs

use crate::context::Context;
use crate::error::SourceError;
use crate::schema::Schema;
use crate::value::{Map, Value};

/// What sources, defaults and conditions can see while an attribute resolves:
/// the task context, the accessors bound so far and the schema's methods.
pub struct Scope<'a> {
  context: &'a Context,
  schema: &'a Schema,
  bound: &'a Map,
}

impl<'a> Scope<'a> {
  pub(crate) fn new(context: &'a Context, schema: &'a Schema, bound: &'a Map) -> Self {
    Self { context, schema, bound }
  }

  pub fn context(&self) -> &Context {
    self.context
  }

  /// A value bound by an attribute resolved earlier in this pass.
  pub fn attribute(&self, accessor: &str) -> Option<&Value> {
    self.bound.get(accessor)
  }

  pub fn bound(&self) -> &Map {
    self.bound
  }

  /// Invokes a task method. Unknown methods are unreachable.
  pub fn call(&self, method: &str) -> Result<Value, SourceError> {
    match self.schema.method(method) {
      Some(f) => (**f)(self),
      None => Err(SourceError::Unreachable),
    }
  }
}
