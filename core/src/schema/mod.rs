// tessera/src/schema/mod.rs

//! Compiled attribute schemas.
//!
//! A `SchemaBuilder` turns declared `AttributeSet`s into an immutable `Schema`:
//! a flat arena of nodes addressed by index, with every coercion and validator
//! tag already looked up in a registry snapshot. All structural mistakes are
//! reported here as `ConfigError`s so that resolution only ever sees data
//! failures.

pub mod declaration;

pub use declaration::{Affix, AttributeSet, AttributeSpec, Condition, DefaultValue, Delegate, Method, Source, ValidatorSpec};

use crate::coercion::Coercion;
use crate::context::Context;
use crate::error::{ConfigError, ResolveError, SourceError};
use crate::messages::{NoTranslations, Translator};
use crate::options::Options;
use crate::registry::Registry;
use crate::resolver::{self, Resolution, Scope};
use crate::validation::Validator;
use crate::value::Value;

use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub type NodeId = usize;

/// How a compiled node obtains its raw value.
#[derive(Clone, Debug)]
pub(crate) enum NodeSource {
  /// Field of the parent attribute's resolved value.
  Parent,
  Declared(Source),
}

#[derive(Clone)]
pub(crate) struct CompiledValidator {
  pub tag: String,
  pub validator: Arc<dyn Validator>,
  pub options: Options,
}

#[derive(Clone)]
pub(crate) struct CompiledCoercion {
  pub tag: String,
  pub coercion: Arc<dyn Coercion>,
}

#[derive(Clone)]
pub(crate) struct Node {
  pub name: String,
  pub accessor: String,
  pub required: bool,
  pub source: NodeSource,
  pub types: Vec<CompiledCoercion>,
  pub coercion_options: Options,
  pub default: Option<DefaultValue>,
  pub validators: Vec<CompiledValidator>,
  pub when: Option<Condition>,
  pub unless: Option<Condition>,
  pub parent: Option<NodeId>,
  pub children: Vec<NodeId>,
}

/// An immutable, compiled attribute tree. Cheap to share behind an `Arc`.
pub struct Schema {
  nodes: Vec<Node>,
  roots: Vec<NodeId>,
  methods: IndexMap<String, Method>,
  translator: Arc<dyn Translator>,
}

impl Schema {
  pub fn builder(attributes: AttributeSet) -> SchemaBuilder {
    SchemaBuilder::new(attributes)
  }

  /// Resolves `context` against this schema.
  pub fn resolve(&self, context: &Context) -> Result<Resolution, ResolveError> {
    resolver::resolve(self, context)
  }

  /// Number of attributes, nested ones included.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Accessors in resolution order (depth-first, declaration order).
  pub fn accessors(&self) -> Vec<&str> {
    let mut out = Vec::with_capacity(self.nodes.len());
    let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
      let node = &self.nodes[id];
      out.push(node.accessor.as_str());
      stack.extend(node.children.iter().rev().copied());
    }
    out
  }

  pub fn has_method(&self, name: &str) -> bool {
    self.methods.contains_key(name)
  }

  pub(crate) fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id]
  }

  pub(crate) fn roots(&self) -> &[NodeId] {
    &self.roots
  }

  pub(crate) fn method(&self, name: &str) -> Option<&Method> {
    self.methods.get(name)
  }

  pub(crate) fn translator(&self) -> &dyn Translator {
    self.translator.as_ref()
  }
}

impl fmt::Debug for Schema {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Schema")
      .field("accessors", &self.accessors())
      .field("methods", &self.methods.keys().collect::<Vec<_>>())
      .finish()
  }
}

/// Collects attributes, task methods, a registry and a translator, then
/// compiles them into a `Schema`.
pub struct SchemaBuilder {
  attributes: AttributeSet,
  registry: Option<Registry>,
  methods: IndexMap<String, Method>,
  translator: Arc<dyn Translator>,
}

impl SchemaBuilder {
  pub fn new(attributes: AttributeSet) -> Self {
    Self {
      attributes,
      registry: None,
      methods: IndexMap::new(),
      translator: Arc::new(NoTranslations),
    }
  }

  /// Compiles against `registry` instead of a snapshot of `Registry::global()`.
  pub fn registry(mut self, registry: Registry) -> Self {
    self.registry = Some(registry);
    self
  }

  /// Defines a task method, usable as a source, default or condition.
  pub fn method(
    mut self,
    name: impl Into<String>,
    f: impl Fn(&Scope<'_>) -> Result<Value, SourceError> + Send + Sync + 'static,
  ) -> Self {
    self.methods.insert(name.into(), Arc::new(f));
    self
  }

  pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
    self.translator = translator;
    self
  }

  #[instrument(name = "SchemaBuilder::compile", skip_all, fields(roots = self.attributes.len()), err(Display))]
  pub fn compile(self) -> Result<Schema, ConfigError> {
    let registry = match self.registry {
      Some(registry) => registry,
      None => Registry::global().read().clone(),
    };

    let mut compiler = Compiler {
      registry: &registry,
      methods: &self.methods,
      nodes: Vec::new(),
      accessors: IndexSet::new(),
    };
    let mut roots = Vec::with_capacity(self.attributes.len());
    for spec in &self.attributes.specs {
      roots.push(compiler.compile(spec, None)?);
    }

    let nodes = compiler.nodes;
    event!(Level::DEBUG, attributes = nodes.len(), methods = self.methods.len(), "Schema compiled.");
    Ok(Schema {
      nodes,
      roots,
      methods: self.methods,
      translator: self.translator,
    })
  }
}

struct Compiler<'a> {
  registry: &'a Registry,
  methods: &'a IndexMap<String, Method>,
  nodes: Vec<Node>,
  accessors: IndexSet<String>,
}

impl Compiler<'_> {
  fn compile(&mut self, spec: &AttributeSpec, parent: Option<NodeId>) -> Result<NodeId, ConfigError> {
    if spec.name.trim().is_empty() {
      return Err(ConfigError::EmptyName);
    }
    let name = spec.name.clone();

    let source = match (&spec.source, parent) {
      (None, Some(_)) => NodeSource::Parent,
      (None, None) => NodeSource::Declared(Source::Context),
      (Some(source), _) => NodeSource::Declared(source.clone()),
    };
    if let NodeSource::Declared(Source::Method(method)) = &source {
      self.require_method(&name, method)?;
    }
    if let Some(DefaultValue::Method(method)) = &spec.default {
      self.require_method(&name, method)?;
    }
    for condition in [&spec.when, &spec.unless].into_iter().flatten() {
      if let Condition::Method(method) = condition {
        self.require_method(&name, method)?;
      }
    }

    let accessor = self.accessor(spec, &source, parent)?;
    if self.methods.contains_key(&accessor) {
      return Err(ConfigError::AccessorShadowsMethod { accessor });
    }
    if !self.accessors.insert(accessor.clone()) {
      return Err(ConfigError::DuplicateAccessor { accessor });
    }

    let mut types = Vec::with_capacity(spec.types.len());
    for tag in &spec.types {
      let coercion = self.registry.coercion(tag).ok_or_else(|| ConfigError::UnknownCoercion {
        attribute: name.clone(),
        tag: tag.clone(),
      })?;
      types.push(CompiledCoercion {
        tag: tag.clone(),
        coercion,
      });
    }

    let mut validators = Vec::with_capacity(spec.validators.len());
    for ValidatorSpec { tag, options } in &spec.validators {
      let validator = self.registry.validator(tag).ok_or_else(|| ConfigError::UnknownValidator {
        attribute: name.clone(),
        tag: tag.clone(),
      })?;
      self.check_gates(&name, tag, options)?;
      validator.check_options(options).map_err(|message| ConfigError::InvalidOptions {
        attribute: name.clone(),
        validator: tag.clone(),
        message,
      })?;
      validators.push(CompiledValidator {
        tag: tag.clone(),
        validator,
        options: options.clone(),
      });
    }

    let id = self.nodes.len();
    self.nodes.push(Node {
      name,
      accessor,
      required: spec.required,
      source,
      types,
      coercion_options: spec.coercion_options.clone(),
      default: spec.default.clone(),
      validators,
      when: spec.when.clone(),
      unless: spec.unless.clone(),
      parent,
      children: Vec::new(),
    });
    event!(Level::TRACE, accessor = %self.nodes[id].accessor, id, "Attribute compiled.");

    for child in &spec.children {
      let child_id = self.compile(child, Some(id))?;
      self.nodes[id].children.push(child_id);
    }
    Ok(id)
  }

  fn require_method(&self, attribute: &str, method: &str) -> Result<(), ConfigError> {
    if self.methods.contains_key(method) {
      Ok(())
    } else {
      Err(ConfigError::UndefinedMethod {
        attribute: attribute.to_string(),
        method: method.to_string(),
      })
    }
  }

  /// Validator-level `if`/`unless` accept a bool, a method name or a predicate.
  fn check_gates(&self, attribute: &str, tag: &str, options: &Options) -> Result<(), ConfigError> {
    for key in ["if", "unless"] {
      match options.get(key) {
        None | Some(Value::Bool(_)) | Some(Value::Proc(_)) => {}
        Some(Value::Symbol(method)) => self.require_method(attribute, method)?,
        Some(other) => {
          return Err(ConfigError::InvalidOptions {
            attribute: attribute.to_string(),
            validator: tag.to_string(),
            message: format!("'{}' must be a bool, method name or predicate, got {}", key, other.inspect()),
          })
        }
      }
    }
    Ok(())
  }

  fn accessor(&self, spec: &AttributeSpec, source: &NodeSource, parent: Option<NodeId>) -> Result<String, ConfigError> {
    let prefix = match &spec.prefix {
      None => String::new(),
      Some(Affix::Literal(text)) => text.clone(),
      Some(Affix::Derived) => format!("{}_", self.source_label(spec, source, parent, "prefix")?),
    };
    let suffix = match &spec.suffix {
      None => String::new(),
      Some(Affix::Literal(text)) => text.clone(),
      Some(Affix::Derived) => format!("_{}", self.source_label(spec, source, parent, "suffix")?),
    };
    Ok(format!("{}{}{}", prefix, spec.name, suffix))
  }

  fn source_label(
    &self,
    spec: &AttributeSpec,
    source: &NodeSource,
    parent: Option<NodeId>,
    affix: &'static str,
  ) -> Result<String, ConfigError> {
    match (source, parent) {
      (NodeSource::Declared(Source::Context), _) => Ok("context".to_string()),
      (NodeSource::Parent, Some(parent)) => Ok(self.nodes[parent].name.clone()),
      (NodeSource::Declared(Source::Method(method)), _) => Ok(method.clone()),
      _ => Err(ConfigError::UnderivableAffix {
        attribute: spec.name.clone(),
        affix,
      }),
    }
  }
}
