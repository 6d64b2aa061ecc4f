// tests/schema_tests.rs
mod common;

use common::*;
use tessera::{AttributeSet, Condition, ConfigError, Options, Schema, Source, Value};

fn compile_err(set: AttributeSet) -> ConfigError {
  builder(set).compile().unwrap_err()
}

#[test]
fn test_schema_is_shareable() {
  fn assert_send_sync<T: Send + Sync>() {}
  assert_send_sync::<Schema>();
}

#[test]
fn test_empty_name_is_rejected() {
  setup_tracing();
  let err = compile_err(AttributeSet::new().required("", |a| a));
  assert!(matches!(err, ConfigError::EmptyName));
}

#[test]
fn test_duplicate_accessor_anywhere_in_tree() {
  setup_tracing();
  let err = compile_err(
    AttributeSet::new()
      .required("street", |a| a)
      .required("shipping", |a| a.children(|set| set.required("street", |s| s))),
  );
  assert!(matches!(err, ConfigError::DuplicateAccessor { ref accessor } if accessor == "street"));
}

#[test]
fn test_affixes_resolve_collisions() {
  setup_tracing();
  let schema = compile(
    AttributeSet::new()
      .required("street", |a| a)
      .required("shipping", |a| a.children(|set| set.required("street", |s| s.prefix(true)))),
  );
  assert_eq!(schema.accessors(), vec!["street", "shipping", "shipping_street"]);
  assert_eq!(schema.len(), 3);
}

#[test]
fn test_accessor_cannot_shadow_method() {
  setup_tracing();
  let err = builder(AttributeSet::new().required("profile", |a| a))
    .method("profile", |_scope| Ok(Value::Nil))
    .compile()
    .unwrap_err();
  assert!(matches!(err, ConfigError::AccessorShadowsMethod { ref accessor } if accessor == "profile"));
}

#[test]
fn test_unknown_tags_are_rejected() {
  setup_tracing();
  let err = compile_err(AttributeSet::new().required("price", |a| a.types(["float", "money"])));
  assert!(matches!(err, ConfigError::UnknownCoercion { ref tag, .. } if tag == "money"));

  let err = compile_err(AttributeSet::new().required("zip", |a| a.validate("zipcode", Options::new())));
  assert!(matches!(err, ConfigError::UnknownValidator { ref attribute, ref tag } if attribute == "zip" && tag == "zipcode"));
}

#[test]
fn test_bounds_require_exactly_one_constraint() {
  setup_tracing();
  let err = compile_err(AttributeSet::new().required("age", |a| {
    a.numeric(Options::new().set("min", 1).set("is", 3))
  }));
  match err {
    ConfigError::InvalidOptions { attribute, validator, message } => {
      assert_eq!(attribute, "age");
      assert_eq!(validator, "numeric");
      assert_eq!(message, "unknown numeric validator options given");
    }
    other => panic!("Expected InvalidOptions, got {:?}", other),
  }

  let err = compile_err(AttributeSet::new().required("name", |a| a.length(Options::new())));
  assert!(matches!(err, ConfigError::InvalidOptions { ref message, .. } if message == "unknown length validator options given"));

  // min and max combine
  compile(AttributeSet::new().required("name", |a| a.length(Options::new().set("min", 1).set("max", 3))));
}

#[test]
fn test_validator_options_are_checked() {
  setup_tracing();
  let cases = [
    AttributeSet::new().required("email", |a| a.format(Options::new().set("with", "@"))),
    AttributeSet::new().required("role", |a| a.inclusion(Options::new())),
    AttributeSet::new().required("role", |a| a.exclusion(Options::new().set("in", "admin"))),
    AttributeSet::new().required("code", |a| a.custom(Options::new())),
    AttributeSet::new().required("code", |a| a.presence().validate("absence", Options::new().set("if", 3))),
  ];
  for set in cases {
    let err = compile_err(set);
    assert!(matches!(err, ConfigError::InvalidOptions { .. }), "unexpected {:?}", err);
  }
}

#[test]
fn test_undefined_methods_are_rejected() {
  setup_tracing();
  let cases = [
    AttributeSet::new().required("a", |a| a.source(Source::method("missing"))),
    AttributeSet::new().required("a", |a| a.default_method("missing")),
    AttributeSet::new().required("a", |a| a.when(Condition::method("missing"))),
    AttributeSet::new().required("a", |a| a.unless(Condition::method("missing"))),
    AttributeSet::new().required("a", |a| a.validate("presence", Options::new().set("if", Value::symbol("missing")))),
  ];
  for set in cases {
    let err = compile_err(set);
    assert!(
      matches!(err, ConfigError::UndefinedMethod { ref method, .. } if method == "missing"),
      "unexpected {:?}",
      err
    );
  }
}

#[test]
fn test_derived_affix_needs_a_named_source() {
  setup_tracing();
  let err = compile_err(AttributeSet::new().required("plan", |a| {
    a.source(Source::object(Value::hash([("plan", "pro")]))).prefix(true)
  }));
  assert!(matches!(err, ConfigError::UnderivableAffix { ref attribute, affix: "prefix" } if attribute == "plan"));

  let err = compile_err(AttributeSet::new().required("plan", |a| {
    a.source(Source::callable(|_scope| Ok(Value::Nil))).suffix(true)
  }));
  assert!(matches!(err, ConfigError::UnderivableAffix { affix: "suffix", .. }));
}

#[test]
fn test_invalid_pattern_is_a_config_error() {
  let err = Value::pattern("(unclosed").unwrap_err();
  assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
}
