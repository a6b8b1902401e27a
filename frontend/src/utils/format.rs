//! Display formatting for money, percentages and timestamps.
//!
//! Inputs are loosely typed: values coming off the channel may be numbers or
//! numeric strings. Anything that does not parse as a number counts as zero.
//! Numbers are grouped the way the `en-IN` locale does (`12,34,567.5`).

use std::fmt::Display;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub const DEFAULT_CURRENCY: &str = "₹";
pub const DEFAULT_PERCENT_DECIMALS: usize = 1;
const MAX_FRACTION_DIGITS: usize = 3;
// enough fraction digits to print any f64 exactly
const EXACT_DIGITS: usize = 1074;

/// A number taken from loosely typed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric(pub f64);

impl Numeric {
  /// Parses the longest numeric prefix of `s`, like `parseFloat`.
  /// Text with no numeric prefix becomes zero, and so does `-0`.
  pub fn parse(s: &str) -> Self {
    let n = parse_float_prefix(s).unwrap_or(0.0);
    Numeric(if n.is_nan() || n == 0.0 { 0.0 } else { n })
  }
}

macro_rules! numeric_from {
  ($($t:ty),*) => {
    $(impl From<$t> for Numeric {
      fn from(v: $t) -> Self {
        Numeric(v as f64)
      }
    })*
  };
}

numeric_from!(f64, f32, i32, i64, u32, u64, usize);

impl From<&str> for Numeric {
  fn from(s: &str) -> Self {
    Numeric::parse(s)
  }
}

impl From<String> for Numeric {
  fn from(s: String) -> Self {
    Numeric::parse(&s)
  }
}

impl From<&String> for Numeric {
  fn from(s: &String) -> Self {
    Numeric::parse(s)
  }
}

impl From<&Value> for Numeric {
  fn from(v: &Value) -> Self {
    match v {
      Value::Number(n) => Numeric(n.as_f64().unwrap_or(0.0)),
      Value::String(s) => Numeric::parse(s),
      _ => Numeric(0.0),
    }
  }
}

fn parse_float_prefix(s: &str) -> Option<f64> {
  let s = s.trim_start();
  let bytes = s.as_bytes();
  let mut end = 0;

  if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
    end = 1;
  }
  if s[end..].starts_with("Infinity") {
    let inf = if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    return Some(inf);
  }

  let int_start = end;
  while end < bytes.len() && bytes[end].is_ascii_digit() {
    end += 1;
  }
  let mut digits = end - int_start;
  if end < bytes.len() && bytes[end] == b'.' {
    let frac_start = end + 1;
    let mut frac_end = frac_start;
    while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
      frac_end += 1;
    }
    digits += frac_end - frac_start;
    if digits > 0 {
      end = frac_end;
    }
  }
  if digits == 0 {
    return None;
  }

  // exponent only counts when at least one digit follows it
  if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
    let mut exp_end = end + 1;
    if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
      exp_end += 1;
    }
    let exp_digits_start = exp_end;
    while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
      exp_end += 1;
    }
    if exp_end > exp_digits_start {
      end = exp_end;
    }
  }

  s[..end].parse::<f64>().ok()
}

/// Groups an unsigned run of integer digits as `xx,xx,xxx`.
fn group_indian(digits: &str) -> String {
  if digits.len() <= 3 {
    return digits.to_string();
  }
  let (head, tail) = digits.split_at(digits.len() - 3);
  let mut groups: Vec<&str> = Vec::new();
  let mut rest = head;
  while rest.len() > 2 {
    let (front, back) = rest.split_at(rest.len() - 2);
    groups.push(back);
    rest = front;
  }
  groups.push(rest);
  groups.reverse();
  format!("{},{}", groups.join(","), tail)
}

/// Rounds an unsigned decimal string to `places` fraction digits. A tie
/// goes away from zero.
fn round_decimal(digits: &str, places: usize) -> String {
  let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
  let mut kept: Vec<u8> = int_part.bytes()
    .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(places))
    .collect();

  if frac_part.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
    let mut carry = true;
    for d in kept.iter_mut().rev() {
      if *d == b'9' {
        *d = b'0';
      } else {
        *d += 1;
        carry = false;
        break;
      }
    }
    if carry {
      kept.insert(0, b'1');
    }
  }

  let int_len = kept.len() - places;
  let int_digits: String = kept[..int_len].iter().map(|&b| b as char).collect();
  if places == 0 {
    return int_digits;
  }
  let frac_digits: String = kept[int_len..].iter().map(|&b| b as char).collect();
  format!("{}.{}", int_digits, frac_digits)
}

/// `en-IN` rendering of a number: grouped integer part, up to three
/// fraction digits, trailing zeros dropped. Rounds the shortest decimal form
/// of `value`, so `1.0005` becomes `1.001`. Negative values keep their sign
/// even when they round to zero.
pub fn localize(value: f64) -> String {
  if value.is_nan() {
    return "NaN".to_string();
  }
  if value.is_infinite() {
    return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
  }

  let fixed = round_decimal(&value.abs().to_string(), MAX_FRACTION_DIGITS);
  let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
  let frac_part = frac_part.trim_end_matches('0');

  let mut out = String::new();
  if value.is_sign_negative() {
    out.push('-');
  }
  out.push_str(&group_indian(int_part));
  if !frac_part.is_empty() {
    out.push('.');
    out.push_str(frac_part);
  }
  out
}

/// `₹12,34,567` for `1234567`.
pub fn format_currency(amount: impl Into<Numeric>) -> String {
  format_currency_with(amount, DEFAULT_CURRENCY)
}

pub fn format_currency_with(amount: impl Into<Numeric>, symbol: &str) -> String {
  let Numeric(n) = amount.into();
  format!("{}{}", symbol, localize(n))
}

/// One decimal place: `12.3%`. Ties round up, as in `12.25` to `12.3%`.
pub fn format_percentage(value: impl Into<Numeric>) -> String {
  format_percentage_with(value, DEFAULT_PERCENT_DECIMALS)
}

pub fn format_percentage_with(value: impl Into<Numeric>, decimals: usize) -> String {
  let Numeric(n) = value.into();
  if n.is_nan() {
    return "NaN%".to_string();
  }
  if n.is_infinite() {
    return if n > 0.0 { "Infinity%".to_string() } else { "-Infinity%".to_string() };
  }
  // round on the exact binary value; -0 prints unsigned
  let rounded = round_decimal(&format!("{:.*}", EXACT_DIGITS, n.abs()), decimals);
  let sign = if n < 0.0 { "-" } else { "" };
  format!("{}{}%", sign, rounded)
}

/// Something a date can be built from: epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
  Millis(f64),
  Text(String),
}

impl From<i64> for Timestamp {
  fn from(ms: i64) -> Self {
    Timestamp::Millis(ms as f64)
  }
}

impl From<f64> for Timestamp {
  fn from(ms: f64) -> Self {
    Timestamp::Millis(ms)
  }
}

impl From<&str> for Timestamp {
  fn from(s: &str) -> Self {
    Timestamp::Text(s.to_string())
  }
}

impl From<String> for Timestamp {
  fn from(s: String) -> Self {
    Timestamp::Text(s)
  }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
  fn from(dt: DateTime<Tz>) -> Self {
    Timestamp::Millis(dt.timestamp_millis() as f64)
  }
}

impl Timestamp {
  fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
    match self {
      Timestamp::Millis(ms) if ms.is_finite() => DateTime::from_timestamp_millis(ms.round() as i64),
      Timestamp::Millis(_) => None,
      Timestamp::Text(s) => {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
          return Some(dt.with_timezone(&Utc));
        }
        // date-time without offset is wall-clock time in `tz`
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
          if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return tz.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc));
          }
        }
        // a bare date is midnight UTC
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
          .and_then(|d| d.and_hms_opt(0, 0, 0))
          .map(|naive| naive.and_utc())
      }
    }
  }
}

/// `d/m/yyyy, h:mm:ss am` in the browser's local time zone.
pub fn format_time(timestamp: impl Into<Timestamp>) -> String {
  format_time_in(timestamp, &Local)
}

pub fn format_time_in<Tz>(timestamp: impl Into<Timestamp>, tz: &Tz) -> String
where
  Tz: TimeZone,
  Tz::Offset: Display,
{
  match timestamp.into().resolve(tz) {
    Some(utc) => utc.with_timezone(tz).format("%-d/%-m/%Y, %-I:%M:%S %P").to_string(),
    None => "Invalid Date".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::FixedOffset;
  use serde_json::json;

  #[test]
  fn currency_groups_indian_style() {
    let s = format_currency(1234567);
    assert_eq!(s, "₹12,34,567");
    assert!(s.starts_with(DEFAULT_CURRENCY));
    assert_eq!(format_currency(999), "₹999");
    assert_eq!(format_currency(1000), "₹1,000");
    assert_eq!(format_currency(123456789.5), "₹12,34,56,789.5");
  }

  #[test]
  fn currency_coerces_garbage_to_zero() {
    assert_eq!(format_currency("abc"), format_currency(0));
    assert_eq!(format_currency(&json!(null)), "₹0");
    assert_eq!(format_currency(&json!(true)), "₹0");
  }

  #[test]
  fn currency_parses_numeric_prefix() {
    assert_eq!(format_currency("2500.75 INR"), "₹2,500.75");
    assert_eq!(format_currency(&json!("  -42")), "₹-42");
    assert_eq!(format_currency_with(1500, "$"), "$1,500");
  }

  #[test]
  fn currency_limits_fraction_digits() {
    assert_eq!(format_currency(1.23456), "₹1.235");
    assert_eq!(format_currency(10.5), "₹10.5");
    assert_eq!(format_currency(f64::NAN), "₹NaN");
  }

  #[test]
  fn percentage_fixed_decimals() {
    assert_eq!(format_percentage_with(33.456, 2), "33.46%");
    assert_eq!(format_percentage(12.34), "12.3%");
    assert_eq!(format_percentage("7"), "7.0%");
    assert_eq!(format_percentage("n/a"), "0.0%");
    assert_eq!(format_percentage_with(-5, 0), "-5%");
  }

  #[test]
  fn ties_round_away_from_zero() {
    assert_eq!(format_percentage(12.25), "12.3%");
    assert_eq!(format_percentage_with(0.125, 2), "0.13%");
    assert_eq!(format_percentage_with(2.5, 0), "3%");
    assert_eq!(format_percentage_with(-2.5, 0), "-3%");
    assert_eq!(format_percentage_with(99.95, 1), "100.0%");
    // 1.005 is stored just below the tie
    assert_eq!(format_percentage_with(1.005, 2), "1.00%");

    assert_eq!(format_currency(2.0625), "₹2.063");
    assert_eq!(format_currency(1.0005), "₹1.001");
    assert_eq!(format_currency(999.9996), "₹1,000");
  }

  #[test]
  fn negative_zero() {
    assert_eq!(format_percentage("-0"), "0.0%");
    assert_eq!(format_percentage(-0.0), "0.0%");
    assert_eq!(format_percentage(-0.04), "-0.0%");
    assert_eq!(localize(-0.0004), "-0");
    assert_eq!(format_currency("-0"), "₹0");
  }

  #[test]
  fn parse_prefix_edge_cases() {
    assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
    assert_eq!(parse_float_prefix("1e"), Some(1.0));
    assert_eq!(parse_float_prefix(".5"), Some(0.5));
    assert_eq!(parse_float_prefix("5."), Some(5.0));
    assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
    assert_eq!(parse_float_prefix("."), None);
    assert_eq!(parse_float_prefix("-"), None);
    assert_eq!(parse_float_prefix(""), None);
  }

  #[test]
  fn time_renders_en_in_layout() {
    let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
    // 2024-01-15T10:00:00Z
    assert_eq!(format_time_in(1_705_312_800_000_i64, &ist), "15/1/2024, 3:30:00 pm");
    assert_eq!(format_time_in("2024-01-15T10:00:00Z", &Utc), "15/1/2024, 10:00:00 am");
    assert_eq!(format_time_in("2024-01-15T00:05:09", &Utc), "15/1/2024, 12:05:09 am");
    assert_eq!(format_time_in("2024-11-03T21:07:00Z", &Utc), "3/11/2024, 9:07:00 pm");
  }

  #[test]
  fn time_rejects_garbage() {
    assert_eq!(format_time_in("yesterday", &Utc), "Invalid Date");
    assert_eq!(format_time_in(f64::NAN, &Utc), "Invalid Date");
  }
}
