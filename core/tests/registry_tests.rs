// tests/registry_tests.rs
mod common;

use common::*;
use serial_test::serial;
use tessera::{
  AttributeSet, CoercionError, ConfigError, Context, ExtensionKind, Options, Registry, ResolveError, Schema, Stage,
  ValidatorError, Value, Violation,
};

fn to_cents(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  let text = value.as_str().ok_or(CoercionError::Invalid)?;
  let amount: f64 = text.trim_start_matches('$').parse().map_err(|_| CoercionError::Invalid)?;
  Ok(Value::Integer((amount * 100.0).round() as i64))
}

fn zipcode(value: &Value, _options: &Options) -> Result<(), ValidatorError> {
  match value.as_str() {
    Some(text) if text.len() == 5 && text.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
    _ => Err(Violation::new("zipcode", "is not a zip code").into()),
  }
}

#[test]
fn test_builtins_are_registered() {
  setup_tracing();
  let registry = Registry::new();
  let coercions: Vec<&str> = registry.coercion_tags().collect();
  assert_eq!(coercions.len(), 13);
  for tag in ["integer", "float", "big_decimal", "boolean", "date", "time", "complex"] {
    assert!(registry.contains(ExtensionKind::Coercion, tag), "{}", tag);
  }
  let validators: Vec<&str> = registry.validator_tags().collect();
  assert_eq!(
    validators,
    vec!["absence", "custom", "exclusion", "format", "inclusion", "length", "numeric", "presence"]
  );
  assert_eq!(Registry::empty().coercion_tags().count(), 0);
}

#[test]
fn test_custom_extensions_resolve() {
  setup_tracing();
  let mut registry = Registry::new();
  registry.register_coercion("cents", to_cents).register_validator("zipcode", zipcode);

  let schema = Schema::builder(
    AttributeSet::new()
      .required("price", |a| a.of_type("cents"))
      .required("zip", |a| a.validate("zipcode", Options::new().set("message", "needs five digits"))),
  )
  .registry(registry)
  .compile()
  .expect("schema should compile");

  let resolution = schema.resolve(&Context::new().with("price", "$12.50").with("zip", "123")).unwrap();
  assert_eq!(resolution.get("price"), Some(&Value::Integer(1250)));
  assert_eq!(resolution.report().full_message, "zip needs five digits.");

  let bad_price = schema.resolve(&Context::new().with("price", "free").with("zip", "12345")).unwrap();
  assert_eq!(bad_price.report().full_message, "price could not coerce into a cents.");
}

#[test]
fn test_deregister_removes_tags() {
  setup_tracing();
  let mut registry = Registry::new();
  assert!(registry.deregister(ExtensionKind::Validator, "presence"));
  assert!(!registry.deregister(ExtensionKind::Validator, "presence"));
  assert!(registry.deregister(ExtensionKind::Coercion, "symbol"));

  let err = Schema::builder(AttributeSet::new().required("name", |a| a.presence()))
    .registry(registry)
    .compile()
    .unwrap_err();
  assert!(matches!(err, ConfigError::UnknownValidator { .. }));
}

#[test]
fn test_extension_bugs_propagate() {
  setup_tracing();
  let mut registry = Registry::new();
  registry.register_coercion("flaky", |_: &Value, _: &Options| -> Result<Value, CoercionError> {
    Err(anyhow::anyhow!("parser crashed").into())
  });
  registry.register_validator("flaky", |_: &Value, _: &Options| -> Result<(), ValidatorError> {
    Err(anyhow::anyhow!("lookup crashed").into())
  });

  let coercing = Schema::builder(AttributeSet::new().required("a", |a| a.types(["flaky", "integer"])))
    .registry(registry.clone())
    .compile()
    .unwrap();
  let err = coercing.resolve(&Context::new().with("a", "1")).unwrap_err();
  assert!(matches!(err, ResolveError::Extension { stage: Stage::Coercion, ref attribute, .. } if attribute == "a"));

  let validating = Schema::builder(AttributeSet::new().required("b", |a| a.validate("flaky", Options::new())))
    .registry(registry)
    .compile()
    .unwrap();
  let err = validating.resolve(&Context::new().with("b", 1)).unwrap_err();
  assert!(matches!(err, ResolveError::Extension { stage: Stage::Validation, .. }));
  assert_eq!(err.to_string(), "The validation of attribute 'b' raised: lookup crashed");
}

#[test]
#[serial]
fn test_global_registry_is_snapshotted_at_compile() {
  setup_tracing();
  Registry::global().write().register_coercion("cents", to_cents);

  let schema = Schema::builder(AttributeSet::new().required("price", |a| a.of_type("cents")))
    .compile()
    .expect("global registration should be visible");

  Registry::global().write().deregister(ExtensionKind::Coercion, "cents");

  let resolution = schema.resolve(&Context::new().with("price", "1.5")).unwrap();
  assert_eq!(resolution.get("price"), Some(&Value::Integer(150)));

  let err = Schema::builder(AttributeSet::new().required("price", |a| a.of_type("cents")))
    .compile()
    .unwrap_err();
  assert!(matches!(err, ConfigError::UnknownCoercion { .. }));
}

#[test]
#[serial]
fn test_global_registry_replacement() {
  setup_tracing();
  Registry::global().write().register_validator("presence", zipcode);

  let schema = Schema::builder(AttributeSet::new().required("zip", |a| a.presence()))
    .compile()
    .unwrap();
  *Registry::global().write() = Registry::new();

  let resolution = schema.resolve(&Context::new().with("zip", "abc")).unwrap();
  assert_eq!(resolution.report().full_message, "zip is not a zip code.");
}
