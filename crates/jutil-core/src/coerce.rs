//! Turning a raw command-line string into a typed JSON value.
//!
//! The target type is resolved in priority order: an explicitly declared type,
//! then the type of the value already stored at the key, then whatever the raw
//! text looks like on its own.
use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionType {
    String,
    Number,
    Boolean,
    Object,
    Null,
}

impl CoercionType {
    pub fn as_str(self) -> &'static str {
        match self {
            CoercionType::String => "string",
            CoercionType::Number => "number",
            CoercionType::Boolean => "boolean",
            CoercionType::Object => "object",
            CoercionType::Null => "null",
        }
    }

    /// Type of a value already in the document. Arrays and null count as
    /// `Object`, so replacing them takes JSON text.
    pub fn of_value(v: &Value) -> Self {
        match v {
            Value::String(_) => CoercionType::String,
            Value::Number(_) => CoercionType::Number,
            Value::Bool(_) => CoercionType::Boolean,
            Value::Object(_) | Value::Array(_) | Value::Null => CoercionType::Object,
        }
    }

    /// Type suggested by the raw text alone.
    pub fn infer(raw: &str) -> Self {
        match raw {
            "true" | "false" => return CoercionType::Boolean,
            "null" => return CoercionType::Null,
            _ => {}
        }
        // only strict JSON numerals; `007`, `+5`, `5.` and ` 5` stay text
        if raw.trim() == raw && serde_json::from_str::<Number>(raw).is_ok() {
            return CoercionType::Number;
        }
        let trimmed = raw.trim_start();
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && serde_json::from_str::<Value>(raw).is_ok()
        {
            return CoercionType::Object;
        }
        CoercionType::String
    }
}

impl fmt::Display for CoercionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoercionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(CoercionType::String),
            "number" => Ok(CoercionType::Number),
            "boolean" => Ok(CoercionType::Boolean),
            "object" => Ok(CoercionType::Object),
            "null" => Ok(CoercionType::Null),
            _ => Err(Error::UnsupportedType(s.to_string())),
        }
    }
}

pub fn resolve_type(raw: &str, declared: Option<CoercionType>, existing: Option<&Value>) -> CoercionType {
    declared
        .or_else(|| existing.map(CoercionType::of_value))
        .unwrap_or_else(|| CoercionType::infer(raw))
}

pub fn coerce(raw: &str, declared: Option<CoercionType>, existing: Option<&Value>) -> Result<Value> {
    let ty = resolve_type(raw, declared, existing);
    debug!(%ty, declared = declared.is_some(), existing = existing.is_some(), "coercing value");
    convert(raw, ty)
}

/// Convert `raw` to exactly `ty`.
pub fn convert(raw: &str, ty: CoercionType) -> Result<Value> {
    match ty {
        CoercionType::String => Ok(Value::String(raw.to_string())),
        CoercionType::Number => parse_number(raw).map(Value::Number),
        CoercionType::Boolean => Ok(Value::Bool(parse_bool(raw))),
        CoercionType::Object => serde_json::from_str(raw).map_err(Error::InvalidJson),
        CoercionType::Null => Ok(Value::Null),
    }
}

fn parse_bool(raw: &str) -> bool {
    !(raw.eq_ignore_ascii_case("false") || raw == "0")
}

// Integral values are stored as integers so `2` serializes as `2`, not `2.0`.
fn parse_number(raw: &str) -> Result<Number> {
    let text = raw.trim();
    let invalid = || Error::InvalidNumber(raw.to_string());
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Number::from(i));
    }
    let f: f64 = text.parse().map_err(|_| invalid())?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Ok(Number::from(f as i64));
    }
    Number::from_f64(f).ok_or_else(invalid)
}
