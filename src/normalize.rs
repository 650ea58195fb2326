//! Coercion of loosely typed numeric fields into `f64`.
//!
//! Backend rows carry amounts as JSON numbers, Brazilian-formatted strings
//! (`"R$ 1.234,56"`) or null. Parsing never fails: unparseable input yields
//! the caller's fallback.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9,\-]").expect("valid non-numeric pattern"));

/// A numeric field as it arrives from an untyped source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawNumber {
    /// Null, absent or a non-numeric JSON type.
    #[default]
    Missing,
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawNumber::Missing)
    }
}

impl From<serde_json::Value> for RawNumber {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => {
                n.as_f64().map_or(RawNumber::Missing, RawNumber::Number)
            }
            serde_json::Value::String(s) => RawNumber::Text(s),
            _ => RawNumber::Missing,
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl From<String> for RawNumber {
    fn from(value: String) -> Self {
        RawNumber::Text(value)
    }
}

impl<T: Into<RawNumber>> From<Option<T>> for RawNumber {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawNumber::Missing, Into::into)
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(serde_json::Value::deserialize(deserializer)?.into())
    }
}

/// Coerce to a number, falling back to `0.0`.
pub fn to_number(input: &RawNumber) -> f64 {
    to_number_or(input, 0.0)
}

/// Coerce to a number, falling back to `fallback` for missing or
/// unparseable input. Numeric input, NaN included, passes through as is.
pub fn to_number_or(input: &RawNumber, fallback: f64) -> f64 {
    match input {
        RawNumber::Missing => fallback,
        RawNumber::Number(n) => *n,
        RawNumber::Text(s) => parse_number_str(s).unwrap_or(fallback),
    }
}

/// Parse a locale-formatted string: every char other than digits, `,` and
/// `-` is dropped, the first `,` becomes the decimal point, and the longest
/// leading float is read.
pub fn parse_number_str(input: &str) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(input, "");
    let normalized = stripped.replacen(',', ".", 1);
    leading_float(&normalized)
}

fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
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
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    s[..end].parse().ok()
}
