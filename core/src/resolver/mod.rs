// tessera/src/resolver/mod.rs

//! Resolves a context against a compiled `Schema`.
//!
//! Attributes are visited depth-first, siblings in declaration order. Each
//! attribute passes through gate, source, default, coercion and validation;
//! data failures are recorded and the walk moves on to the next sibling.
//! Children only run below a parent that resolved cleanly to a non-nil value.

mod resolution;
mod scope;

pub use resolution::{ResolvedAttribute, Resolution};
pub use scope::Scope;

use crate::context::Context;
use crate::error::{CoercionError, ResolveError, SourceError, Stage, ValidatorError};
use crate::messages;
use crate::report::Errors;
use crate::schema::{CompiledValidator, Condition, DefaultValue, Node, NodeId, NodeSource, Schema, Source};
use crate::value::{FieldRead, Map, Value};

use tracing::{event, instrument, span, Level};

/// What a source produced for one attribute.
enum Sourced {
  Present(Value),
  Absent,
  /// The source object could not provide the field.
  Unreachable,
}

impl From<FieldRead> for Sourced {
  fn from(read: FieldRead) -> Self {
    match read {
      FieldRead::Found(value) => Sourced::Present(value),
      FieldRead::Missing => Sourced::Absent,
      FieldRead::Unreadable => Sourced::Unreachable,
    }
  }
}

/// Hashes and records yield their `name` entry; anything else is the value itself.
fn from_object(object: Value, name: &str) -> Sourced {
  match object {
    Value::Nil => Sourced::Absent,
    Value::Hash(_) | Value::Record(_) => object.read_field(name).into(),
    other => Sourced::Present(other),
  }
}

fn extension(node: &Node, stage: Stage, source: anyhow::Error) -> ResolveError {
  event!(Level::ERROR, accessor = %node.accessor, %stage, error = %source, "Extension raised during resolution.");
  ResolveError::Extension {
    attribute: node.accessor.clone(),
    stage,
    source,
  }
}

fn method_error(node: &Node, stage: Stage, method: &str, error: SourceError) -> ResolveError {
  let source = match error {
    SourceError::Unreachable => anyhow::anyhow!("method '{}' is not accessible", method),
    SourceError::Failed(source) => source,
  };
  extension(node, stage, source)
}

#[instrument(name = "Schema::resolve", skip_all, fields(attributes = schema.len()), err(Display))]
pub fn resolve(schema: &Schema, context: &Context) -> Result<Resolution, ResolveError> {
  event!(Level::DEBUG, "Resolution starting.");
  let mut walk = Walk {
    schema,
    context,
    bound: Map::new(),
    attributes: Vec::with_capacity(schema.len()),
    errors: Errors::new(),
  };
  for &root in schema.roots() {
    walk.visit(root, None)?;
  }

  if walk.errors.is_empty() {
    event!(Level::DEBUG, bound = walk.bound.len(), "Resolution complete.");
  } else {
    event!(Level::WARN, failures = walk.errors.len(), "Resolution found invalid attributes.");
  }
  Ok(Resolution {
    attributes: walk.attributes,
    bound: walk.bound,
    errors: walk.errors,
  })
}

struct Walk<'a> {
  schema: &'a Schema,
  context: &'a Context,
  bound: Map,
  attributes: Vec<ResolvedAttribute>,
  errors: Errors,
}

impl<'a> Walk<'a> {
  fn scope(&self) -> Scope<'_> {
    Scope::new(self.context, self.schema, &self.bound)
  }

  fn visit(&mut self, id: NodeId, parent: Option<&Value>) -> Result<(), ResolveError> {
    let schema = self.schema;
    let node = schema.node(id);
    let attribute_span = span!(Level::DEBUG, "attribute", accessor = %node.accessor, id);
    let _attribute_guard = attribute_span.enter();

    let mut resolved = ResolvedAttribute::new(id, node.accessor.clone());
    let gate_open = self.gate(node)?;
    let required = node.required && gate_open;

    let sourced = self.source(node, parent)?;
    let unreachable = matches!(sourced, Sourced::Unreachable);
    if let Sourced::Present(raw) = sourced {
      resolved.raw_value = Some(raw);
    }

    let mut value = resolved.raw_value.clone().filter(|raw| !raw.is_nil());
    if value.is_none() {
      value = self.default(node)?.filter(|default| !default.is_nil());
    }

    let Some(value) = value else {
      if required {
        let message = if unreachable {
          messages::unreachable(schema.translator())
        } else {
          messages::required(schema.translator())
        };
        self.fail(&mut resolved, message);
      } else {
        event!(Level::TRACE, "Optional attribute absent; children skipped.");
        if gate_open {
          self.validate(node, &Value::Nil, &mut resolved)?;
        }
        self.bind(&mut resolved, Value::Nil);
      }
      self.attributes.push(resolved);
      return Ok(());
    };

    let value = match self.coerce(node, value)? {
      Ok(value) => value,
      Err(message) => {
        self.fail(&mut resolved, message);
        self.attributes.push(resolved);
        return Ok(());
      }
    };

    if gate_open {
      self.validate(node, &value, &mut resolved)?;
    }
    if !resolved.is_valid() {
      self.attributes.push(resolved);
      return Ok(());
    }

    self.bind(&mut resolved, value.clone());
    self.attributes.push(resolved);
    for &child in &node.children {
      self.visit(child, Some(&value))?;
    }
    Ok(())
  }

  fn bind(&mut self, resolved: &mut ResolvedAttribute, value: Value) {
    if resolved.is_valid() {
      event!(Level::TRACE, value = %value.inspect(), "Attribute bound.");
      self.bound.insert(resolved.accessor.clone(), value.clone());
      resolved.value = Some(value);
    }
  }

  fn fail(&mut self, resolved: &mut ResolvedAttribute, message: String) {
    event!(Level::WARN, %message, "Attribute invalid.");
    self.errors.add(resolved.accessor.clone(), message.clone());
    resolved.errors.push(message);
  }

  /// `when`/`unless` at the attribute level.
  fn gate(&self, node: &Node) -> Result<bool, ResolveError> {
    if let Some(condition) = &node.when {
      if !self.condition(node, condition)? {
        return Ok(false);
      }
    }
    if let Some(condition) = &node.unless {
      if self.condition(node, condition)? {
        return Ok(false);
      }
    }
    Ok(true)
  }

  fn condition(&self, node: &Node, condition: &Condition) -> Result<bool, ResolveError> {
    let scope = self.scope();
    match condition {
      Condition::Constant(open) => Ok(*open),
      Condition::Method(method) => scope
        .call(method)
        .map(|value| value.truthy())
        .map_err(|error| method_error(node, Stage::Condition, method, error)),
      Condition::Callable(f) => f(&scope).map_err(|source| extension(node, Stage::Condition, source)),
    }
  }

  fn source(&self, node: &Node, parent: Option<&Value>) -> Result<Sourced, ResolveError> {
    let scope = self.scope();
    let object = match &node.source {
      NodeSource::Parent => return Ok(parent.map_or(Sourced::Unreachable, |value| value.read_field(&node.name).into())),
      NodeSource::Declared(Source::Context) => {
        return Ok(match self.context.get(&node.name) {
          Some(value) => Sourced::Present(value),
          None => Sourced::Absent,
        })
      }
      NodeSource::Declared(Source::Method(method)) => scope.call(method),
      NodeSource::Declared(Source::Callable(f)) => f(&scope),
      NodeSource::Declared(Source::Delegate(delegate)) => delegate.call(&scope),
      NodeSource::Declared(Source::Object(object)) => Ok(object.clone()),
    };
    match object {
      Ok(object) => Ok(from_object(object, &node.name)),
      Err(SourceError::Unreachable) => Ok(Sourced::Unreachable),
      Err(SourceError::Failed(source)) => Err(extension(node, Stage::Source, source)),
    }
  }

  fn default(&self, node: &Node) -> Result<Option<Value>, ResolveError> {
    let scope = self.scope();
    match &node.default {
      None => Ok(None),
      Some(DefaultValue::Value(value)) => Ok(Some(value.clone())),
      Some(DefaultValue::Method(method)) => scope
        .call(method)
        .map(Some)
        .map_err(|error| method_error(node, Stage::Default, method, error)),
      Some(DefaultValue::Callable(f)) => f(&scope)
        .map(Some)
        .map_err(|source| extension(node, Stage::Default, source)),
    }
  }

  /// Tries each declared type in order. The inner `Err` is the failure message.
  fn coerce(&self, node: &Node, value: Value) -> Result<Result<Value, String>, ResolveError> {
    if node.types.is_empty() {
      return Ok(Ok(value));
    }
    for candidate in &node.types {
      match candidate.coercion.coerce(&value, &node.coercion_options) {
        Ok(coerced) => {
          event!(Level::TRACE, tag = %candidate.tag, "Attribute coerced.");
          return Ok(Ok(coerced));
        }
        Err(CoercionError::Invalid) => continue,
        Err(CoercionError::Unexpected(source)) => return Err(extension(node, Stage::Coercion, source)),
      }
    }
    let tags: Vec<String> = node.types.iter().map(|candidate| candidate.tag.clone()).collect();
    Ok(Err(messages::coercion_failed(self.schema.translator(), &tags)))
  }

  fn validate(&mut self, node: &Node, value: &Value, resolved: &mut ResolvedAttribute) -> Result<(), ResolveError> {
    for check in &node.validators {
      if value.is_nil() && check.options.flag("allow_nil") {
        continue;
      }
      if !self.validator_gate(node, check, value)? {
        event!(Level::TRACE, tag = %check.tag, "Validator skipped by its condition.");
        continue;
      }
      match check.validator.validate(value, &check.options) {
        Ok(()) => {}
        Err(ValidatorError::Invalid(violation)) => {
          let message = violation.render(&check.options, self.schema.translator());
          self.fail(resolved, message);
        }
        Err(ValidatorError::Unexpected(source)) => return Err(extension(node, Stage::Validation, source)),
      }
    }
    Ok(())
  }

  /// Validator-level `if`/`unless`: a bool, a method name or a value predicate.
  fn validator_gate(&self, node: &Node, check: &CompiledValidator, value: &Value) -> Result<bool, ResolveError> {
    let test = |gate: &Value| -> Result<bool, ResolveError> {
      match gate {
        Value::Symbol(method) => self
          .scope()
          .call(method)
          .map(|result| result.truthy())
          .map_err(|error| method_error(node, Stage::Condition, method, error)),
        Value::Proc(predicate) => predicate
          .call(value)
          .map_err(|source| extension(node, Stage::Condition, source)),
        other => Ok(other.truthy()),
      }
    };
    if let Some(gate) = check.options.get("if") {
      if !test(gate)? {
        return Ok(false);
      }
    }
    if let Some(gate) = check.options.get("unless") {
      if test(gate)? {
        return Ok(false);
      }
    }
    Ok(true)
  }
}
