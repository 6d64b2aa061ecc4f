// tessera/src/coercion/numeric.rs

use crate::error::CoercionError;
use crate::options::Options;
use crate::value::numeric::strip_separators;
use crate::value::{Complex, Decimal, Rational, Value};

/// Parses integer text with an optional sign and radix prefix
/// (`0x`, `0b`, `0o`, `0d`, or a bare leading `0` for octal).
pub fn parse_integer(text: &str) -> Option<i64> {
  let cleaned = strip_separators(text.trim())?;
  let (negative, body) = match cleaned.as_bytes().first()? {
    b'-' => (true, &cleaned[1..]),
    b'+' => (false, &cleaned[1..]),
    _ => (false, cleaned.as_str()),
  };
  let lower = body.to_ascii_lowercase();
  let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
    (16, rest)
  } else if let Some(rest) = lower.strip_prefix("0b") {
    (2, rest)
  } else if let Some(rest) = lower.strip_prefix("0o") {
    (8, rest)
  } else if let Some(rest) = lower.strip_prefix("0d") {
    (10, rest)
  } else if lower.len() > 1 && lower.starts_with('0') {
    (8, &lower[1..])
  } else {
    (10, lower.as_str())
  };
  if digits.is_empty() || digits.starts_with(['+', '-']) {
    return None;
  }
  let magnitude = i128::from_str_radix(digits, radix).ok()?;
  let signed = if negative { -magnitude } else { magnitude };
  i64::try_from(signed).ok()
}

/// Hex is the only radix float text accepts; `"010"` stays decimal.
fn is_hex(text: &str) -> bool {
  let body = text.trim().trim_start_matches(['+', '-']);
  body.len() > 2 && body.get(..2).map_or(false, |prefix| prefix.eq_ignore_ascii_case("0x"))
}

fn finite(value: f64) -> Result<f64, CoercionError> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(CoercionError::Invalid)
  }
}

pub fn to_integer(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  let integer = match value {
    Value::Integer(i) => Some(*i),
    Value::Float(f) if f.is_finite() && f.abs() < 9.2e18 => Some(f.trunc() as i64),
    Value::Decimal(d) => d.trunc_i64(),
    Value::Rational(r) => Some(r.numer() / r.denom()),
    Value::Complex(c) if c.im == 0.0 && c.re.is_finite() => Some(c.re.trunc() as i64),
    Value::String(s) => parse_integer(s),
    _ => None,
  };
  integer.map(Value::Integer).ok_or(CoercionError::Invalid)
}

pub fn to_float(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  let float = match value {
    Value::Integer(i) => *i as f64,
    Value::Float(f) => finite(*f)?,
    Value::Decimal(d) => finite(d.to_f64())?,
    Value::Rational(r) => r.to_f64(),
    Value::String(s) if is_hex(s) => parse_integer(s).ok_or(CoercionError::Invalid)? as f64,
    Value::String(s) => {
      let cleaned = strip_separators(s.trim()).ok_or(CoercionError::Invalid)?;
      // Rust accepts "inf"/"nan" spellings; only digits and exponents qualify here.
      if !cleaned.bytes().any(|b| b.is_ascii_digit()) || cleaned.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return Err(CoercionError::Invalid);
      }
      finite(cleaned.parse::<f64>().map_err(|_| CoercionError::Invalid)?)?
    }
    _ => return Err(CoercionError::Invalid),
  };
  Ok(Value::Float(float))
}

pub fn to_big_decimal(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  let decimal = match value {
    Value::Decimal(d) => Some(*d),
    Value::Integer(i) => Some(Decimal::from_i64(*i)),
    Value::Float(f) => Decimal::from_f64(*f),
    Value::Rational(r) => Decimal::from_f64(r.to_f64()),
    Value::String(s) => Decimal::parse(s),
    _ => None,
  };
  decimal.map(Value::Decimal).ok_or(CoercionError::Invalid)
}

pub fn to_rational(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  let rational = match value {
    Value::Rational(r) => Some(*r),
    Value::Integer(i) => Some(Rational::from_i64(*i)),
    Value::Float(f) => Decimal::from_f64(*f).and_then(Rational::from_decimal),
    Value::Decimal(d) => Rational::from_decimal(*d),
    Value::String(s) => Rational::parse(s),
    _ => None,
  };
  rational.map(Value::Rational).ok_or(CoercionError::Invalid)
}

pub fn to_complex(value: &Value, _options: &Options) -> Result<Value, CoercionError> {
  let complex = match value {
    Value::Complex(c) => Some(*c),
    Value::String(s) => Complex::parse(s),
    numeric => numeric.as_f64().map(|re| Complex::new(re, 0.0)),
  };
  complex.map(Value::Complex).ok_or(CoercionError::Invalid)
}
