// tessera/src/coercion/temporal.rs

//! Date and time coercions. All accept a `strptime` option holding a chrono
//! format string; without it ISO-8601 forms are expected.

use crate::error::CoercionError;
use crate::options::Options;
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

fn text<'a>(value: &'a Value) -> Result<&'a str, CoercionError> {
  value.as_str().map(str::trim).ok_or(CoercionError::Invalid)
}

pub fn to_date(value: &Value, options: &Options) -> Result<Value, CoercionError> {
  let date = match value {
    Value::Date(d) => *d,
    Value::DateTime(dt) => dt.date(),
    Value::Time(t) => t.date_naive(),
    other => {
      let raw = text(other)?;
      let format = options.str("strptime").unwrap_or("%Y-%m-%d");
      NaiveDate::parse_from_str(raw, format).map_err(|_| CoercionError::Invalid)?
    }
  };
  Ok(Value::Date(date))
}

pub fn to_datetime(value: &Value, options: &Options) -> Result<Value, CoercionError> {
  let datetime = match value {
    Value::DateTime(dt) => *dt,
    Value::Date(d) => d.and_time(NaiveTime::MIN),
    Value::Time(t) => t.naive_local(),
    other => {
      let raw = text(other)?;
      match options.str("strptime") {
        Some(format) => NaiveDateTime::parse_from_str(raw, format).map_err(|_| CoercionError::Invalid)?,
        None => DATETIME_FORMATS
          .iter()
          .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
          .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|t| t.naive_local()))
          .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
              .ok()
              .map(|d| d.and_time(NaiveTime::MIN))
          })
          .ok_or(CoercionError::Invalid)?,
      }
    }
  };
  Ok(Value::DateTime(datetime))
}

/// Zoned timestamps. Naive inputs are taken as UTC; integers are Unix seconds.
pub fn to_time(value: &Value, options: &Options) -> Result<Value, CoercionError> {
  let utc = FixedOffset::east_opt(0).ok_or(CoercionError::Invalid)?;
  let time: DateTime<FixedOffset> = match value {
    Value::Time(t) => *t,
    Value::DateTime(dt) => dt.and_utc().with_timezone(&utc),
    Value::Date(d) => d.and_time(NaiveTime::MIN).and_utc().with_timezone(&utc),
    Value::Integer(secs) => DateTime::<Utc>::from_timestamp(*secs, 0)
      .ok_or(CoercionError::Invalid)?
      .with_timezone(&utc),
    other => {
      let raw = text(other)?;
      match options.str("strptime") {
        Some(format) => DateTime::parse_from_str(raw, format)
          .or_else(|_| NaiveDateTime::parse_from_str(raw, format).map(|dt| dt.and_utc().with_timezone(&utc)))
          .map_err(|_| CoercionError::Invalid)?,
        None => match DateTime::parse_from_rfc3339(raw) {
          Ok(t) => t,
          Err(_) => match to_datetime(other, &Options::new())? {
            Value::DateTime(dt) => dt.and_utc().with_timezone(&utc),
            _ => return Err(CoercionError::Invalid),
          },
        },
      }
    }
  };
  Ok(Value::Time(time))
}
