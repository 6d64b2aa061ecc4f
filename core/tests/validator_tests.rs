// tests/validator_tests.rs
mod common;

use common::*;
use tessera::{Kind, NoTranslations, Options, Proc, Registry, ValidatorError, Value};

/// Runs a validator and renders its message the way the resolver does.
fn check(tag: &str, value: impl Into<Value>, options: Options) -> Result<(), String> {
  match Registry::new().validate(tag, &value.into(), &options) {
    Ok(()) => Ok(()),
    Err(ValidatorError::Invalid(violation)) => Err(violation.render(&options, &NoTranslations)),
    Err(ValidatorError::Unexpected(error)) => panic!("unexpected validator error: {}", error),
  }
}

#[test]
fn test_presence_and_absence() {
  setup_tracing();
  assert_eq!(check("presence", "  ", Options::new()), Err("cannot be empty".to_string()));
  assert_eq!(check("presence", Value::Nil, Options::new()), Err("cannot be empty".to_string()));
  assert_eq!(check("presence", Value::Array(Vec::new()), Options::new()), Err("cannot be empty".to_string()));
  assert_eq!(check("presence", 0, Options::new()), Ok(()));
  assert_eq!(check("presence", false, Options::new()), Ok(()));

  assert_eq!(check("absence", "x", Options::new()), Err("must be empty".to_string()));
  assert_eq!(check("absence", "", Options::new()), Ok(()));
}

#[test]
fn test_format_with_and_without() {
  setup_tracing();
  let options = Options::new()
    .set("with", Value::pattern(r"^\w+@").unwrap())
    .set("without", Value::pattern(r"\.invalid$").unwrap());

  assert_eq!(check("format", "ann@example.com", options.clone()), Ok(()));
  assert_eq!(
    check("format", "ann@example.invalid", options.clone()),
    Err("is an invalid format".to_string())
  );
  assert_eq!(check("format", 42, options), Err("is an invalid format".to_string()));
}

#[test]
fn test_inclusion_uses_case_equality() {
  setup_tracing();
  let members = Value::list([
    Value::from("draft"),
    Value::pattern("^pub").unwrap(),
    Value::Kind(Kind::Integer),
    Value::predicate(|v| v.as_str().map_or(false, |s| s.ends_with("!"))),
  ]);
  let options = Options::new().set("in", members);

  for candidate in [Value::from("draft"), Value::from("published"), Value::Integer(3), Value::from("now!")] {
    assert_eq!(check("inclusion", candidate.clone(), options.clone()), Ok(()), "{:?}", candidate);
  }
  assert_eq!(
    check("inclusion", "archived", options),
    Err(r#"must be one of: "draft", /^pub/, Integer, #<Proc>"#.to_string())
  );
}

#[test]
fn test_inclusion_and_exclusion_ranges() {
  setup_tracing();
  let inclusive = Options::new().set("in", Value::range(1, 5));
  assert_eq!(check("inclusion", 5, inclusive.clone()), Ok(()));
  assert_eq!(check("inclusion", 6, inclusive), Err("must be within 1 and 5".to_string()));

  let exclusive = Options::new().set("in", Value::exclusive_range(1, 5));
  assert_eq!(check("inclusion", 5, exclusive), Err("must be within 1 and 4".to_string()));

  let floor = Options::new().set("in", Value::exclusive_range(0, i64::MIN));
  assert_eq!(check("inclusion", 5, floor), Err(format!("must be within 0 and {}", i64::MIN)));

  let excluded = Options::new()
    .set("within", Value::range(10, 20))
    .set("within_message", "must stay outside %{min}-%{max}");
  assert_eq!(check("exclusion", 15, excluded), Err("must stay outside 10-20".to_string()));
}

#[test]
fn test_length_constraints() {
  setup_tracing();
  let range = Options::new().set("within", Value::range(2, 4));
  assert_eq!(check("length", "abc", range.clone()), Ok(()));
  assert_eq!(check("length", "abcde", range), Err("length must be within 2 and 4".to_string()));

  let not_in = Options::new().set("not_in", Value::range(2, 4));
  assert_eq!(check("length", "abc", not_in), Err("length must not be within 2 and 4".to_string()));

  assert_eq!(check("length", "ab", Options::new().set("is", 3)), Err("length must be 3".to_string()));
  assert_eq!(check("length", "abc", Options::new().set("is_not", 3)), Err("length must not be 3".to_string()));
  assert_eq!(check("length", "abcd", Options::new().set("max", 3)), Err("length must be at most 3".to_string()));
  assert_eq!(check("length", Value::list([1, 2]), Options::new().set("min", 2)), Ok(()));
  assert_eq!(check("length", 12345, Options::new().set("min", 2)), Err("length must be at least 2".to_string()));
}

#[test]
fn test_numeric_constraints() {
  setup_tracing();
  assert_eq!(check("numeric", 2.5, Options::new().set("min", 1).set("max", 3)), Ok(()));
  assert_eq!(check("numeric", 7, Options::new().set("is", 7)), Ok(()));
  assert_eq!(check("numeric", 7, Options::new().set("is_not", 7)), Err("must not be 7".to_string()));
  assert_eq!(check("numeric", 0.5, Options::new().set("min", 1.5)), Err("must be at least 1.5".to_string()));
  assert_eq!(
    check("numeric", "7", Options::new().set("min", 1)),
    Err("must be at least 1".to_string())
  );
}

#[test]
fn test_message_precedence_and_interpolation() {
  setup_tracing();
  let options = Options::new()
    .set("min", 3)
    .set("max", 9)
    .set("message", "is out of range")
    .set("max_message", "is above %{max}");
  assert_eq!(check("numeric", 10, options.clone()), Err("is above 9".to_string()));
  assert_eq!(check("numeric", 1, options), Err("is out of range".to_string()));
}

#[test]
fn test_custom_predicate() {
  setup_tracing();
  let even = Options::new().set("validator", Value::predicate(|v| v.as_i64().map_or(false, |i| i % 2 == 0)));
  assert_eq!(check("custom", 4, even.clone()), Ok(()));
  assert_eq!(check("custom", 3, even), Err("is not valid".to_string()));

  let broken = Options::new().set(
    "validator",
    Value::Proc(Proc::new(|_: &Value| -> anyhow::Result<bool> { Err(anyhow::anyhow!("lookup failed")) })),
  );
  let result = Registry::new().validate("custom", &Value::Integer(1), &broken);
  assert!(matches!(result, Err(ValidatorError::Unexpected(ref e)) if e.to_string() == "lookup failed"));
}
