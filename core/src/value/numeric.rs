// tessera/src/value/numeric.rs

//! Exact numeric types that have no direct std counterpart: base-10 `Decimal`,
//! reduced `Rational` and a plain `Complex` pair.

use std::fmt;

/// Strips `_` separators. A separator must sit between two digits.
pub(crate) fn strip_separators(text: &str) -> Option<String> {
  let bytes = text.as_bytes();
  let mut out = String::with_capacity(text.len());
  for (idx, ch) in text.char_indices() {
    if ch == '_' {
      let prev_ok = idx > 0 && bytes[idx - 1].is_ascii_alphanumeric();
      let next_ok = bytes.get(idx + 1).map_or(false, |b| b.is_ascii_alphanumeric());
      if !prev_ok || !next_ok {
        return None;
      }
      continue;
    }
    out.push(ch);
  }
  Some(out)
}

/// Significant digits a `Decimal` keeps; longer text is rounded half away from zero.
pub const DECIMAL_PRECISION: usize = 38;

/// Largest scale magnitude `Decimal::new` and `Decimal::parse` accept.
pub const MAX_SCALE: i32 = 1_000_000_000;

/// Wide-exponent decimal: `mantissa * 10^-scale`, kept normalized so that
/// derived equality is numeric equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
  mantissa: i128,
  scale: i32,
}

impl Decimal {
  /// `None` when `scale` lies outside `-MAX_SCALE..=MAX_SCALE`.
  pub fn new(mantissa: i128, scale: i32) -> Option<Self> {
    if !(-MAX_SCALE..=MAX_SCALE).contains(&scale) {
      return None;
    }
    Some(Self { mantissa, scale }.normalized())
  }

  pub fn from_i64(value: i64) -> Self {
    Self {
      mantissa: value as i128,
      scale: 0,
    }
    .normalized()
  }

  /// Uses the shortest round-trip representation of the float.
  pub fn from_f64(value: f64) -> Option<Self> {
    if !value.is_finite() {
      return None;
    }
    Self::parse(&format!("{:e}", value))
  }

  /// Parses `[-+]digits[.digits][e[-+]digits]`, allowing `_` between digits.
  pub fn parse(text: &str) -> Option<Self> {
    let cleaned = strip_separators(text.trim())?;
    let (negative, body) = match cleaned.as_bytes().first()? {
      b'-' => (true, &cleaned[1..]),
      b'+' => (false, &cleaned[1..]),
      _ => (false, cleaned.as_str()),
    };
    let (number, exponent) = match body.find(|c| c == 'e' || c == 'E') {
      Some(pos) => (&body[..pos], body[pos + 1..].parse::<i32>().ok()?),
      None => (body, 0),
    };
    let (int_part, frac_part) = match number.split_once('.') {
      Some((i, f)) => (i, f),
      None => (number, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
      return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
      return None;
    }

    let mut mantissa: i128 = 0;
    let mut significant = 0;
    let mut dropped: i64 = 0;
    let mut round_up = false;
    for b in int_part.bytes().chain(frac_part.bytes()) {
      let digit = (b - b'0') as i128;
      if significant < DECIMAL_PRECISION {
        if mantissa != 0 || digit != 0 {
          significant += 1;
        }
        mantissa = mantissa * 10 + digit;
      } else {
        if dropped == 0 {
          round_up = digit >= 5;
        }
        dropped += 1;
      }
    }
    if round_up {
      mantissa += 1;
    }
    if negative {
      mantissa = -mantissa;
    }
    let scale = frac_part.len() as i64 - exponent as i64 - dropped;
    Self::new(mantissa, i32::try_from(scale).ok()?)
  }

  fn normalized(mut self) -> Self {
    if self.mantissa == 0 {
      return Self { mantissa: 0, scale: 0 };
    }
    // At most 38 trailing zeros fit in an i128, so the scale stays well inside i32.
    while self.mantissa % 10 == 0 {
      self.mantissa /= 10;
      self.scale -= 1;
    }
    self
  }

  pub fn mantissa(&self) -> i128 {
    self.mantissa
  }

  pub fn scale(&self) -> i32 {
    self.scale
  }

  pub fn to_f64(&self) -> f64 {
    // Parsing the rendered text keeps the conversion correctly rounded.
    self.to_string().parse::<f64>().unwrap_or(f64::NAN)
  }

  /// Truncates toward zero. `None` when the result does not fit an `i64`.
  pub fn trunc_i64(&self) -> Option<i64> {
    let whole = if self.scale > 0 {
      if self.scale > 38 {
        0
      } else {
        self.mantissa / 10i128.pow(self.scale as u32)
      }
    } else {
      let factor = 10i128.checked_pow(self.scale.unsigned_abs())?;
      self.mantissa.checked_mul(factor)?
    };
    i64::try_from(whole).ok()
  }
}

impl fmt::Display for Decimal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.mantissa < 0 { "-" } else { "" };
    let digits = self.mantissa.unsigned_abs().to_string();
    if self.scale <= 0 {
      let zeros = self.scale.unsigned_abs() as usize;
      if zeros > 20 {
        return write!(f, "{}{}e{}", sign, digits, zeros);
      }
      return write!(f, "{}{}{}", sign, digits, "0".repeat(zeros));
    }
    let scale = self.scale as usize;
    if digits.len() > scale {
      let (int_part, frac_part) = digits.split_at(digits.len() - scale);
      write!(f, "{}{}.{}", sign, int_part, frac_part)
    } else if scale - digits.len() > 20 {
      write!(f, "{}{}e-{}", sign, digits, scale)
    } else {
      write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
    }
  }
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
  while b != 0 {
    let t = a % b;
    a = b;
    b = t;
  }
  a.abs()
}

/// A reduced fraction with a positive denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
  numer: i64,
  denom: i64,
}

impl Rational {
  /// `None` for a zero denominator or when the reduced fraction leaves `i64`.
  pub fn new(numer: i64, denom: i64) -> Option<Self> {
    if denom == 0 {
      return None;
    }
    let (mut numer, mut denom) = (numer as i128, denom as i128);
    if denom < 0 {
      numer = -numer;
      denom = -denom;
    }
    let divisor = gcd(numer, denom).max(1);
    Some(Self {
      numer: i64::try_from(numer / divisor).ok()?,
      denom: i64::try_from(denom / divisor).ok()?,
    })
  }

  pub fn from_i64(value: i64) -> Self {
    Self { numer: value, denom: 1 }
  }

  pub fn from_decimal(value: Decimal) -> Option<Self> {
    if value.scale() <= 0 {
      let whole = value.trunc_i64()?;
      return Some(Self::from_i64(whole));
    }
    let numer = i64::try_from(value.mantissa()).ok()?;
    let denom = 10i64.checked_pow(value.scale() as u32)?;
    Self::new(numer, denom)
  }

  /// Accepts `"n/d"`, integers and decimal text.
  pub fn parse(text: &str) -> Option<Self> {
    let text = text.trim();
    match text.split_once('/') {
      Some((n, d)) => {
        let numer = strip_separators(n.trim())?.parse::<i64>().ok()?;
        let denom = strip_separators(d.trim())?.parse::<i64>().ok()?;
        Self::new(numer, denom)
      }
      None => Self::from_decimal(Decimal::parse(text)?),
    }
  }

  pub fn numer(&self) -> i64 {
    self.numer
  }

  pub fn denom(&self) -> i64 {
    self.denom
  }

  pub fn to_f64(&self) -> f64 {
    self.numer as f64 / self.denom as f64
  }
}

impl fmt::Display for Rational {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.numer, self.denom)
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
  pub re: f64,
  pub im: f64,
}

impl Complex {
  pub fn new(re: f64, im: f64) -> Self {
    Self { re, im }
  }

  /// Accepts `"a+bi"`, `"a-bi"`, `"bi"`, `"i"` and plain reals.
  pub fn parse(text: &str) -> Option<Self> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
      return None;
    }
    let Some(body) = cleaned.strip_suffix('i') else {
      return Self::parse_real(&cleaned).map(|re| Self::new(re, 0.0));
    };
    // The split point is the last sign that does not open the text or an exponent.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
      .rev()
      .find(|&idx| (bytes[idx] == b'+' || bytes[idx] == b'-') && !matches!(bytes[idx - 1], b'e' | b'E'));
    match split {
      Some(idx) => {
        let re = Self::parse_real(&body[..idx])?;
        let im = Self::parse_imaginary(&body[idx..])?;
        Some(Self::new(re, im))
      }
      None => Some(Self::new(0.0, Self::parse_imaginary(body)?)),
    }
  }

  fn parse_real(text: &str) -> Option<f64> {
    strip_separators(text)?.parse::<f64>().ok().filter(|v| v.is_finite())
  }

  fn parse_imaginary(text: &str) -> Option<f64> {
    match text {
      "" | "+" => Some(1.0),
      "-" => Some(-1.0),
      other => Self::parse_real(other),
    }
  }
}

impl fmt::Display for Complex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.im < 0.0 {
      write!(f, "{}-{}i", self.re, -self.im)
    } else {
      write!(f, "{}+{}i", self.re, self.im)
    }
  }
}
