// tessera/src/value/mod.rs

//! The dynamic `Value` model shared by contexts, sources, coercions and validators.

pub mod numeric;

pub use numeric::{Complex, Decimal, Rational};

use crate::error::ConfigError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Ordered string-keyed map used for hash values.
pub type Map = IndexMap<String, Value>;

/// Host objects that expose named fields to attribute sources.
///
/// Returning `None` means the record has no such field, which the resolver
/// reports as an unreachable source rather than a missing value.
pub trait Record: Send + Sync {
  fn field(&self, name: &str) -> Option<Value>;

  fn type_name(&self) -> &str {
    "record"
  }
}

/// A value predicate used for case-equality membership and custom validation.
pub trait Predicate: Send + Sync {
  fn test(&self, value: &Value) -> anyhow::Result<bool>;
}

impl<F> Predicate for F
where
  F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync,
{
  fn test(&self, value: &Value) -> anyhow::Result<bool> {
    self(value)
  }
}

#[derive(Clone)]
pub struct Proc(Arc<dyn Predicate>);

impl Proc {
  pub fn new(predicate: impl Predicate + 'static) -> Self {
    Proc(Arc::new(predicate))
  }

  /// Wraps an infallible closure.
  pub fn from_fn(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
    Proc::new(move |value: &Value| -> anyhow::Result<bool> { Ok(f(value)) })
  }

  pub fn call(&self, value: &Value) -> anyhow::Result<bool> {
    self.0.test(value)
  }
}

impl fmt::Debug for Proc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Proc(..)")
  }
}

/// Value kinds, usable as membership patterns (`Kind::String` matches any string).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
  Nil,
  Bool,
  Integer,
  Float,
  Decimal,
  Rational,
  Complex,
  /// Any of the numeric kinds.
  Numeric,
  String,
  Symbol,
  Array,
  Hash,
  Date,
  DateTime,
  Time,
  Range,
  Regex,
  Kind,
  Proc,
  Record,
}

impl Kind {
  pub fn matches(&self, value: &Value) -> bool {
    match self {
      Kind::Numeric => value.is_numeric(),
      other => value.kind() == *other,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Range {
  pub start: Value,
  pub end: Value,
  pub exclusive: bool,
}

impl Range {
  pub fn contains(&self, value: &Value) -> bool {
    let above_start = matches!(self.start.compare(value), Some(Ordering::Less | Ordering::Equal));
    let below_end = match self.end.compare(value) {
      Some(Ordering::Greater) => true,
      Some(Ordering::Equal) => !self.exclusive,
      _ => false,
    };
    above_start && below_end
  }

  /// The largest member for display purposes; exclusive integer ranges step back by one.
  pub fn last(&self) -> Value {
    match (&self.end, self.exclusive) {
      (Value::Integer(end), true) => Value::Integer(end.checked_sub(1).unwrap_or(*end)),
      (end, _) => end.clone(),
    }
  }
}

#[derive(Clone)]
pub enum Value {
  Nil,
  Bool(bool),
  Integer(i64),
  Float(f64),
  Decimal(Decimal),
  Rational(Rational),
  Complex(Complex),
  String(String),
  Symbol(String),
  Array(Vec<Value>),
  Hash(Map),
  Date(NaiveDate),
  DateTime(NaiveDateTime),
  Time(DateTime<FixedOffset>),
  Range(Box<Range>),
  Regex(Regex),
  Kind(Kind),
  Proc(Proc),
  Record(Arc<dyn Record>),
}

/// Outcome of reading a named field off a value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRead {
  Found(Value),
  Missing,
  Unreadable,
}

impl Value {
  pub fn symbol(name: impl Into<String>) -> Self {
    Value::Symbol(name.into())
  }

  pub fn range(start: impl Into<Value>, end: impl Into<Value>) -> Self {
    Value::Range(Box::new(Range {
      start: start.into(),
      end: end.into(),
      exclusive: false,
    }))
  }

  pub fn exclusive_range(start: impl Into<Value>, end: impl Into<Value>) -> Self {
    Value::Range(Box::new(Range {
      start: start.into(),
      end: end.into(),
      exclusive: true,
    }))
  }

  /// Compiles a regex pattern value.
  pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
    Regex::new(pattern)
      .map(Value::Regex)
      .map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
      })
  }

  pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
    Value::Proc(Proc::from_fn(f))
  }

  pub fn record(record: impl Record + 'static) -> Self {
    Value::Record(Arc::new(record))
  }

  pub fn list<I, V>(items: I) -> Self
  where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
  {
    Value::Array(items.into_iter().map(Into::into).collect())
  }

  pub fn hash<I, K, V>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    Value::Hash(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }

  pub fn kind(&self) -> Kind {
    match self {
      Value::Nil => Kind::Nil,
      Value::Bool(_) => Kind::Bool,
      Value::Integer(_) => Kind::Integer,
      Value::Float(_) => Kind::Float,
      Value::Decimal(_) => Kind::Decimal,
      Value::Rational(_) => Kind::Rational,
      Value::Complex(_) => Kind::Complex,
      Value::String(_) => Kind::String,
      Value::Symbol(_) => Kind::Symbol,
      Value::Array(_) => Kind::Array,
      Value::Hash(_) => Kind::Hash,
      Value::Date(_) => Kind::Date,
      Value::DateTime(_) => Kind::DateTime,
      Value::Time(_) => Kind::Time,
      Value::Range(_) => Kind::Range,
      Value::Regex(_) => Kind::Regex,
      Value::Kind(_) => Kind::Kind,
      Value::Proc(_) => Kind::Proc,
      Value::Record(_) => Kind::Record,
    }
  }

  pub fn is_nil(&self) -> bool {
    matches!(self, Value::Nil)
  }

  /// Everything except `nil` and `false` is truthy.
  pub fn truthy(&self) -> bool {
    !matches!(self, Value::Nil | Value::Bool(false))
  }

  pub fn is_numeric(&self) -> bool {
    matches!(
      self,
      Value::Integer(_) | Value::Float(_) | Value::Decimal(_) | Value::Rational(_)
    )
  }

  /// Nil, empty or whitespace-only strings, and empty collections are blank.
  pub fn is_blank(&self) -> bool {
    match self {
      Value::Nil => true,
      Value::String(s) | Value::Symbol(s) => s.trim().is_empty(),
      Value::Array(items) => items.is_empty(),
      Value::Hash(map) => map.is_empty(),
      _ => false,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Integer(i) => Some(*i),
      _ => None,
    }
  }

  /// Numeric view used for comparisons; complex numbers have no ordering.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Integer(i) => Some(*i as f64),
      Value::Float(f) => Some(*f),
      Value::Decimal(d) => Some(d.to_f64()),
      Value::Rational(r) => Some(r.to_f64()),
      _ => None,
    }
  }

  /// Text view of strings and symbols.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) | Value::Symbol(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_array(&self) -> Option<&[Value]> {
    match self {
      Value::Array(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_hash(&self) -> Option<&Map> {
    match self {
      Value::Hash(map) => Some(map),
      _ => None,
    }
  }

  pub fn as_range(&self) -> Option<&Range> {
    match self {
      Value::Range(range) => Some(range),
      _ => None,
    }
  }

  /// Size of strings (in characters), symbols and collections.
  pub fn length(&self) -> Option<usize> {
    match self {
      Value::String(s) | Value::Symbol(s) => Some(s.chars().count()),
      Value::Array(items) => Some(items.len()),
      Value::Hash(map) => Some(map.len()),
      _ => None,
    }
  }

  /// Reads `name` off a hash or record.
  pub fn read_field(&self, name: &str) -> FieldRead {
    match self {
      Value::Hash(map) => match map.get(name) {
        Some(value) => FieldRead::Found(value.clone()),
        None => FieldRead::Missing,
      },
      Value::Record(record) => match record.field(name) {
        Some(value) => FieldRead::Found(value),
        None => FieldRead::Unreadable,
      },
      _ => FieldRead::Unreadable,
    }
  }

  /// Ordering between comparable values of compatible kinds.
  pub fn compare(&self, other: &Value) -> Option<Ordering> {
    match (self, other) {
      (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
      (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64()?.partial_cmp(&b.as_f64()?),
      (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
      (Value::Symbol(a), Value::Symbol(b)) => Some(a.cmp(b)),
      (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
      (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
      (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
      _ => None,
    }
  }

  /// Case-equality: `self` is the pattern, `value` the candidate.
  pub fn case_eq(&self, value: &Value) -> anyhow::Result<bool> {
    Ok(match self {
      Value::Regex(re) => value.as_str().map_or(false, |text| re.is_match(text)),
      Value::Kind(kind) => kind.matches(value),
      Value::Proc(predicate) => predicate.call(value)?,
      Value::Range(range) => range.contains(value),
      pattern => pattern == value,
    })
  }

  /// Literal, debug-style rendering: strings quoted, symbols prefixed with `:`.
  pub fn inspect(&self) -> String {
    match self {
      Value::Nil => "nil".to_string(),
      Value::String(s) => format!("{:?}", s),
      Value::Symbol(s) => format!(":{}", s),
      Value::Array(items) => {
        let inner: Vec<String> = items.iter().map(Value::inspect).collect();
        format!("[{}]", inner.join(", "))
      }
      Value::Hash(map) => {
        let inner: Vec<String> = map.iter().map(|(k, v)| format!("{:?} => {}", k, v.inspect())).collect();
        format!("{{{}}}", inner.join(", "))
      }
      Value::Rational(r) => format!("({})", r),
      Value::Complex(c) => format!("({})", c),
      Value::Range(range) => {
        let dots = if range.exclusive { "..." } else { ".." };
        format!("{}{}{}", range.start.inspect(), dots, range.end.inspect())
      }
      Value::Regex(re) => format!("/{}/", re.as_str()),
      other => other.to_string(),
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Nil => Ok(()),
      Value::Bool(b) => write!(f, "{}", b),
      Value::Integer(i) => write!(f, "{}", i),
      Value::Float(x) => {
        if x.is_finite() && x.fract() == 0.0 {
          write!(f, "{:.1}", x)
        } else {
          write!(f, "{}", x)
        }
      }
      Value::Decimal(d) => write!(f, "{}", d),
      Value::Rational(r) => write!(f, "{}", r),
      Value::Complex(c) => write!(f, "{}", c),
      Value::String(s) | Value::Symbol(s) => f.write_str(s),
      Value::Array(_) | Value::Hash(_) | Value::Range(_) | Value::Regex(_) => f.write_str(&self.inspect()),
      Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
      Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
      Value::Time(t) => write!(f, "{}", t.to_rfc3339()),
      Value::Kind(kind) => write!(f, "{:?}", kind),
      Value::Proc(_) => f.write_str("#<Proc>"),
      Value::Record(record) => write!(f, "#<{}>", record.type_name()),
    }
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Decimal(d) => write!(f, "Decimal({})", d),
      Value::Date(_) | Value::DateTime(_) | Value::Time(_) => write!(f, "{:?}({})", self.kind(), self),
      Value::Kind(kind) => write!(f, "Kind({:?})", kind),
      Value::Proc(_) | Value::Record(_) => f.write_str(&self.to_string()),
      other => f.write_str(&other.inspect()),
    }
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Value) -> bool {
    match (self, other) {
      (Value::Nil, Value::Nil) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Integer(a), Value::Integer(b)) => a == b,
      (Value::Decimal(a), Value::Decimal(b)) => a == b,
      (Value::Rational(a), Value::Rational(b)) => a == b,
      (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64() == b.as_f64(),
      (Value::Complex(a), Value::Complex(b)) => a == b,
      (Value::String(a), Value::String(b)) => a == b,
      (Value::Symbol(a), Value::Symbol(b)) => a == b,
      (Value::Array(a), Value::Array(b)) => a == b,
      (Value::Hash(a), Value::Hash(b)) => a == b,
      (Value::Date(a), Value::Date(b)) => a == b,
      (Value::DateTime(a), Value::DateTime(b)) => a == b,
      (Value::Time(a), Value::Time(b)) => a == b,
      (Value::Range(a), Value::Range(b)) => a == b,
      (Value::Regex(a), Value::Regex(b)) => a.as_str() == b.as_str(),
      (Value::Kind(a), Value::Kind(b)) => a == b,
      (Value::Proc(a), Value::Proc(b)) => Arc::as_ptr(&a.0) as *const () == Arc::as_ptr(&b.0) as *const (),
      (Value::Record(a), Value::Record(b)) => Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const (),
      _ => false,
    }
  }
}

impl Default for Value {
  fn default() -> Self {
    Value::Nil
  }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self {
    Value::Bool(v)
  }
}

impl From<i64> for Value {
  fn from(v: i64) -> Self {
    Value::Integer(v)
  }
}

impl From<i32> for Value {
  fn from(v: i32) -> Self {
    Value::Integer(v as i64)
  }
}

impl From<usize> for Value {
  fn from(v: usize) -> Self {
    Value::Integer(v as i64)
  }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self {
    Value::Float(v)
  }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self {
    Value::String(v.to_string())
  }
}

impl From<String> for Value {
  fn from(v: String) -> Self {
    Value::String(v)
  }
}

impl From<Decimal> for Value {
  fn from(v: Decimal) -> Self {
    Value::Decimal(v)
  }
}

impl From<Rational> for Value {
  fn from(v: Rational) -> Self {
    Value::Rational(v)
  }
}

impl From<Complex> for Value {
  fn from(v: Complex) -> Self {
    Value::Complex(v)
  }
}

impl From<NaiveDate> for Value {
  fn from(v: NaiveDate) -> Self {
    Value::Date(v)
  }
}

impl From<NaiveDateTime> for Value {
  fn from(v: NaiveDateTime) -> Self {
    Value::DateTime(v)
  }
}

impl From<DateTime<FixedOffset>> for Value {
  fn from(v: DateTime<FixedOffset>) -> Self {
    Value::Time(v)
  }
}

impl From<Kind> for Value {
  fn from(v: Kind) -> Self {
    Value::Kind(v)
  }
}

impl From<Vec<Value>> for Value {
  fn from(v: Vec<Value>) -> Self {
    Value::Array(v)
  }
}

impl From<Map> for Value {
  fn from(v: Map) -> Self {
    Value::Hash(v)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self {
    v.map_or(Value::Nil, Into::into)
  }
}

impl From<&serde_json::Value> for Value {
  fn from(json: &serde_json::Value) -> Self {
    match json {
      serde_json::Value::Null => Value::Nil,
      serde_json::Value::Bool(b) => Value::Bool(*b),
      serde_json::Value::Number(n) => match n.as_i64() {
        Some(i) => Value::Integer(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
      },
      serde_json::Value::String(s) => Value::String(s.clone()),
      serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
      serde_json::Value::Object(map) => Value::Hash(map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect()),
    }
  }
}
