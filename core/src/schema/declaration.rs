// tessera/src/schema/declaration.rs

//! The declaration API: `AttributeSet` collects `AttributeSpec` trees which a
//! `SchemaBuilder` later compiles.

use crate::error::SourceError;
use crate::options::Options;
use crate::resolver::Scope;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A task method: reads the scope, returns a value.
pub type Method = Arc<dyn Fn(&Scope<'_>) -> Result<Value, SourceError> + Send + Sync>;

/// A call-able source object, for sources that carry their own state.
pub trait Delegate: Send + Sync {
  fn call(&self, scope: &Scope<'_>) -> Result<Value, SourceError>;
}

/// Where an attribute reads its raw value from.
///
/// A method, callable, delegate or object source yields an object: a hash
/// yields its entry for the attribute name, a record its field, and any other
/// value is the attribute value itself.
#[derive(Clone)]
pub enum Source {
  /// The task context, keyed by attribute name. Implicit for root attributes.
  Context,
  Method(String),
  Callable(Method),
  Delegate(Arc<dyn Delegate>),
  Object(Value),
}

impl Source {
  pub fn method(name: impl Into<String>) -> Self {
    Source::Method(name.into())
  }

  pub fn callable(f: impl Fn(&Scope<'_>) -> Result<Value, SourceError> + Send + Sync + 'static) -> Self {
    Source::Callable(Arc::new(f))
  }

  pub fn delegate(delegate: impl Delegate + 'static) -> Self {
    Source::Delegate(Arc::new(delegate))
  }

  pub fn object(value: impl Into<Value>) -> Self {
    Source::Object(value.into())
  }
}

impl fmt::Debug for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Source::Context => f.write_str("Context"),
      Source::Method(name) => write!(f, "Method({})", name),
      Source::Callable(_) => f.write_str("Callable(..)"),
      Source::Delegate(_) => f.write_str("Delegate(..)"),
      Source::Object(value) => write!(f, "Object({:?})", value),
    }
  }
}

/// Evaluated lazily, only when the raw value is absent or nil.
#[derive(Clone)]
pub enum DefaultValue {
  Value(Value),
  Method(String),
  Callable(Arc<dyn Fn(&Scope<'_>) -> anyhow::Result<Value> + Send + Sync>),
}

impl DefaultValue {
  pub fn method(name: impl Into<String>) -> Self {
    DefaultValue::Method(name.into())
  }

  pub fn callable(f: impl Fn(&Scope<'_>) -> anyhow::Result<Value> + Send + Sync + 'static) -> Self {
    DefaultValue::Callable(Arc::new(f))
  }
}

impl From<Value> for DefaultValue {
  fn from(value: Value) -> Self {
    DefaultValue::Value(value)
  }
}

/// Attribute-level `if`/`unless` gate.
#[derive(Clone)]
pub enum Condition {
  Constant(bool),
  /// The method's result is tested for truthiness.
  Method(String),
  Callable(Arc<dyn Fn(&Scope<'_>) -> anyhow::Result<bool> + Send + Sync>),
}

impl Condition {
  pub fn method(name: impl Into<String>) -> Self {
    Condition::Method(name.into())
  }

  pub fn callable(f: impl Fn(&Scope<'_>) -> anyhow::Result<bool> + Send + Sync + 'static) -> Self {
    Condition::Callable(Arc::new(f))
  }
}

impl From<bool> for Condition {
  fn from(value: bool) -> Self {
    Condition::Constant(value)
  }
}

/// Prefix or suffix for the generated accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affix {
  Literal(String),
  /// Derived from the source name: `context_` / `_context`, `<method>_`, `<parent>_`.
  Derived,
}

impl From<&str> for Affix {
  fn from(value: &str) -> Self {
    Affix::Literal(value.to_string())
  }
}

impl From<bool> for Affix {
  fn from(value: bool) -> Self {
    if value {
      Affix::Derived
    } else {
      Affix::Literal(String::new())
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorSpec {
  pub tag: String,
  pub options: Options,
}

/// One declared attribute and its nested children.
#[derive(Clone)]
pub struct AttributeSpec {
  pub(crate) name: String,
  pub(crate) required: bool,
  pub(crate) source: Option<Source>,
  pub(crate) types: Vec<String>,
  pub(crate) coercion_options: Options,
  pub(crate) default: Option<DefaultValue>,
  pub(crate) validators: Vec<ValidatorSpec>,
  pub(crate) when: Option<Condition>,
  pub(crate) unless: Option<Condition>,
  pub(crate) prefix: Option<Affix>,
  pub(crate) suffix: Option<Affix>,
  pub(crate) children: Vec<AttributeSpec>,
}

impl AttributeSpec {
  pub fn new(name: impl Into<String>, required: bool) -> Self {
    Self {
      name: name.into(),
      required,
      source: None,
      types: Vec::new(),
      coercion_options: Options::new(),
      default: None,
      validators: Vec::new(),
      when: None,
      unless: None,
      prefix: None,
      suffix: None,
      children: Vec::new(),
    }
  }

  pub fn required(name: impl Into<String>) -> Self {
    Self::new(name, true)
  }

  pub fn optional(name: impl Into<String>) -> Self {
    Self::new(name, false)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_required(&self) -> bool {
    self.required
  }

  pub fn of_type(mut self, tag: impl Into<String>) -> Self {
    self.types = vec![tag.into()];
    self
  }

  /// Fallback chain; the first tag that coerces wins.
  pub fn types<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.types = tags.into_iter().map(Into::into).collect();
    self
  }

  /// Passed to every coercion, e.g. `strptime`.
  pub fn coercion_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.coercion_options.insert(key, value);
    self
  }

  pub fn source(mut self, source: Source) -> Self {
    self.source = Some(source);
    self
  }

  /// A literal default.
  pub fn default(self, value: impl Into<Value>) -> Self {
    self.default_with(DefaultValue::Value(value.into()))
  }

  pub fn default_method(self, method: impl Into<String>) -> Self {
    self.default_with(DefaultValue::Method(method.into()))
  }

  pub fn default_with(mut self, default: DefaultValue) -> Self {
    self.default = Some(default);
    self
  }

  pub fn prefix(mut self, prefix: impl Into<Affix>) -> Self {
    self.prefix = Some(prefix.into());
    self
  }

  pub fn suffix(mut self, suffix: impl Into<Affix>) -> Self {
    self.suffix = Some(suffix.into());
    self
  }

  /// `if:`. A closed gate makes the attribute optional and skips its validators.
  pub fn when(mut self, condition: impl Into<Condition>) -> Self {
    self.when = Some(condition.into());
    self
  }

  pub fn unless(mut self, condition: impl Into<Condition>) -> Self {
    self.unless = Some(condition.into());
    self
  }

  pub fn validate(mut self, tag: impl Into<String>, options: Options) -> Self {
    self.validators.push(ValidatorSpec {
      tag: tag.into(),
      options,
    });
    self
  }

  pub fn presence(self) -> Self {
    self.validate("presence", Options::new())
  }

  pub fn absence(self) -> Self {
    self.validate("absence", Options::new())
  }

  pub fn format(self, options: Options) -> Self {
    self.validate("format", options)
  }

  pub fn inclusion(self, options: Options) -> Self {
    self.validate("inclusion", options)
  }

  pub fn exclusion(self, options: Options) -> Self {
    self.validate("exclusion", options)
  }

  pub fn length(self, options: Options) -> Self {
    self.validate("length", options)
  }

  pub fn numeric(self, options: Options) -> Self {
    self.validate("numeric", options)
  }

  pub fn custom(self, options: Options) -> Self {
    self.validate("custom", options)
  }

  /// Nested attributes read from this attribute's resolved value.
  pub fn children(mut self, declare: impl FnOnce(AttributeSet) -> AttributeSet) -> Self {
    self.children.extend(declare(AttributeSet::new()).specs);
    self
  }
}

impl fmt::Debug for AttributeSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AttributeSpec")
      .field("name", &self.name)
      .field("required", &self.required)
      .field("source", &self.source)
      .field("types", &self.types)
      .field("validators", &self.validators)
      .field("children", &self.children)
      .finish()
  }
}

/// Ordered attribute declarations.
#[derive(Clone, Debug, Default)]
pub struct AttributeSet {
  pub(crate) specs: Vec<AttributeSpec>,
}

impl AttributeSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn attribute(mut self, spec: AttributeSpec) -> Self {
    self.specs.push(spec);
    self
  }

  pub fn required(self, name: impl Into<String>, configure: impl FnOnce(AttributeSpec) -> AttributeSpec) -> Self {
    self.attribute(configure(AttributeSpec::required(name)))
  }

  pub fn optional(self, name: impl Into<String>, configure: impl FnOnce(AttributeSpec) -> AttributeSpec) -> Self {
    self.attribute(configure(AttributeSpec::optional(name)))
  }

  /// Declares several required attributes sharing one configuration.
  pub fn required_each(mut self, names: &[&str], configure: impl Fn(AttributeSpec) -> AttributeSpec) -> Self {
    for name in names {
      self = self.attribute(configure(AttributeSpec::required(*name)));
    }
    self
  }

  pub fn optional_each(mut self, names: &[&str], configure: impl Fn(AttributeSpec) -> AttributeSpec) -> Self {
    for name in names {
      self = self.attribute(configure(AttributeSpec::optional(*name)));
    }
    self
  }

  pub fn len(&self) -> usize {
    self.specs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.specs.is_empty()
  }

  pub fn specs(&self) -> &[AttributeSpec] {
    &self.specs
  }
}
