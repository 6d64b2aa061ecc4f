// tessera/src/resolver/resolution.rs

use crate::report::{Errors, ValidationReport};
use crate::schema::NodeId;
use crate::value::{Map, Value};

/// One attribute's outcome within a resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
  pub(crate) node: NodeId,
  pub(crate) accessor: String,
  pub(crate) raw_value: Option<Value>,
  pub(crate) value: Option<Value>,
  pub(crate) errors: Vec<String>,
}

impl ResolvedAttribute {
  pub(crate) fn new(node: NodeId, accessor: String) -> Self {
    Self {
      node,
      accessor,
      raw_value: None,
      value: None,
      errors: Vec::new(),
    }
  }

  pub fn node(&self) -> NodeId {
    self.node
  }

  pub fn accessor(&self) -> &str {
    &self.accessor
  }

  /// What the source produced, before defaults and coercion.
  pub fn raw_value(&self) -> Option<&Value> {
    self.raw_value.as_ref()
  }

  /// `None` when the attribute failed.
  pub fn value(&self) -> Option<&Value> {
    self.value.as_ref()
  }

  pub fn errors(&self) -> &[String] {
    &self.errors
  }

  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }
}

/// The result of resolving one context against a schema.
///
/// Attributes skipped because their parent was nil or failed are absent.
#[derive(Debug, Clone)]
pub struct Resolution {
  pub(crate) attributes: Vec<ResolvedAttribute>,
  pub(crate) bound: Map,
  pub(crate) errors: Errors,
}

impl Resolution {
  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }

  /// The value bound under `accessor`.
  pub fn get(&self, accessor: &str) -> Option<&Value> {
    self.bound.get(accessor)
  }

  pub fn contains(&self, accessor: &str) -> bool {
    self.bound.contains_key(accessor)
  }

  /// Accessor/value pairs in resolution order.
  pub fn values(&self) -> &Map {
    &self.bound
  }

  pub fn into_values(self) -> Map {
    self.bound
  }

  pub fn attribute(&self, accessor: &str) -> Option<&ResolvedAttribute> {
    self.attributes.iter().find(|attribute| attribute.accessor == accessor)
  }

  /// Visited attributes in resolution order.
  pub fn attributes(&self) -> &[ResolvedAttribute] {
    &self.attributes
  }

  pub fn errors(&self) -> &Errors {
    &self.errors
  }

  pub fn report(&self) -> ValidationReport {
    self.errors.to_report()
  }
}
