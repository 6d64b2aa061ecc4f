// tessera/src/messages.rs

//! Failure messages: violations raised by validators, the translation seam and
//! `%{placeholder}` interpolation.

use crate::options::Options;
use std::fmt;

pub const REQUIRED_KEY: &str = "attributes.required";
pub const UNREACHABLE_KEY: &str = "attributes.unreachable";

const REQUIRED_TEXT: &str = "is required";
const UNREACHABLE_TEXT: &str = "must be accessible via the source";

/// Looks up message templates by translation key (`validators.length.min`, ...).
pub trait Translator: Send + Sync {
  fn translate(&self, key: &str) -> Option<String>;
}

/// Translator that knows nothing; built-in texts apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslations;

impl Translator for NoTranslations {
  fn translate(&self, _key: &str) -> Option<String> {
    None
  }
}

/// A failed validation rule, before message resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
  key: String,
  overrides: Vec<String>,
  template: String,
  vars: Vec<(String, String)>,
}

impl Violation {
  /// `key` is relative to `validators.`; `template` is the built-in text.
  pub fn new(key: impl Into<String>, template: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      overrides: Vec::new(),
      template: template.into(),
      vars: Vec::new(),
    }
  }

  /// Option key holding a variant-specific override (e.g. `min_message`).
  pub fn overridable_by(mut self, option: impl Into<String>) -> Self {
    self.overrides.push(option.into());
    self
  }

  pub fn var(mut self, name: impl Into<String>, value: impl ToString) -> Self {
    self.vars.push((name.into(), value.to_string()));
    self
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  /// Resolution order: specific override, then `message`, then translation, then built-in text.
  pub fn render(&self, options: &Options, translator: &dyn Translator) -> String {
    let template = self
      .overrides
      .iter()
      .find_map(|option| options.str(option))
      .or_else(|| options.str("message"))
      .map(str::to_string)
      .or_else(|| translator.translate(&format!("validators.{}", self.key)))
      .unwrap_or_else(|| self.template.clone());
    interpolate(&template, &self.vars)
  }
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&interpolate(&self.template, &self.vars))
  }
}

/// Replaces `%{name}` with the matching var. Unknown placeholders are kept.
pub fn interpolate(template: &str, vars: &[(String, String)]) -> String {
  let mut out = String::with_capacity(template.len());
  let mut rest = template;
  while let Some(start) = rest.find("%{") {
    out.push_str(&rest[..start]);
    let after = &rest[start + 2..];
    match after.find('}') {
      Some(end) => {
        let name = &after[..end];
        match vars.iter().find(|(k, _)| k == name) {
          Some((_, value)) => out.push_str(value),
          None => out.push_str(&rest[start..start + 3 + end]),
        }
        rest = &after[end + 1..];
      }
      None => {
        out.push_str(&rest[start..]);
        rest = "";
      }
    }
  }
  out.push_str(rest);
  out
}

fn translated(translator: &dyn Translator, key: &str, fallback: &str, vars: &[(String, String)]) -> String {
  let template = translator.translate(key).unwrap_or_else(|| fallback.to_string());
  interpolate(&template, vars)
}

pub(crate) fn required(translator: &dyn Translator) -> String {
  translated(translator, REQUIRED_KEY, REQUIRED_TEXT, &[])
}

pub(crate) fn unreachable(translator: &dyn Translator) -> String {
  translated(translator, UNREACHABLE_KEY, UNREACHABLE_TEXT, &[])
}

/// `could not coerce into a float`, `an integer`, or `one of: float, big_decimal`.
pub(crate) fn coercion_failed(translator: &dyn Translator, tags: &[String]) -> String {
  if let [tag] = tags {
    let type_name = tag.replace('_', " ");
    let starts_with_vowel = type_name.starts_with(|c: char| "aeiou".contains(c));
    let (key, fallback) = if starts_with_vowel {
      ("coercions.into_an", "could not coerce into an %{type}")
    } else {
      ("coercions.into_a", "could not coerce into a %{type}")
    };
    return translated(translator, key, fallback, &[("type".to_string(), type_name)]);
  }
  translated(
    translator,
    "coercions.into_any",
    "could not coerce into one of: %{types}",
    &[("types".to_string(), tags.join(", "))],
  )
}
