// tessera/src/report.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Failure messages collected during one resolution, grouped per accessor in
/// the order they were raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Errors {
  messages: IndexMap<String, Vec<String>>,
}

impl Errors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, accessor: impl Into<String>, message: impl Into<String>) {
    self.messages.entry(accessor.into()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }

  /// Total number of messages.
  pub fn len(&self) -> usize {
    self.messages.values().map(Vec::len).sum()
  }

  pub fn for_accessor(&self, accessor: &str) -> &[String] {
    self.messages.get(accessor).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn messages(&self) -> &IndexMap<String, Vec<String>> {
    &self.messages
  }

  /// `"a is required. b could not coerce into an integer."`, or empty.
  pub fn full_message(&self) -> String {
    let fragments: Vec<String> = self
      .messages
      .iter()
      .flat_map(|(accessor, messages)| messages.iter().map(move |message| format!("{} {}", accessor, message)))
      .collect();
    if fragments.is_empty() {
      String::new()
    } else {
      format!("{}.", fragments.join(". "))
    }
  }

  pub fn to_report(&self) -> ValidationReport {
    ValidationReport {
      messages: self.messages.clone(),
      full_message: self.full_message(),
    }
  }
}

/// The consumer-facing summary of a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
  pub messages: IndexMap<String, Vec<String>>,
  pub full_message: String,
}

impl ValidationReport {
  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }
}
