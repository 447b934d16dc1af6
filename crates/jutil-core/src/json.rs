use serde::Serialize;
use serde_json::{Number, Value};
use serde_json::ser::{PrettyFormatter, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOpts {
    /// Emit everything on one line.
    pub compact: bool,
    /// Indent unit for pretty output. Digits mean that many spaces (at most 10).
    pub indent: String,
}

impl Default for JsonOpts {
    fn default() -> Self {
        Self {
            compact: false,
            indent: "\t".to_string(),
        }
    }
}

impl JsonOpts {
    pub fn compact() -> Self {
        Self {
            compact: true,
            ..Self::default()
        }
    }

    fn indent_unit(&self) -> String {
        match self.indent.parse::<usize>() {
            Ok(n) => " ".repeat(n.min(10)),
            Err(_) => self.indent.clone(),
        }
    }
}

// `1.0` is written as `1`, matching JSON.stringify.
fn integral_floats_as_ints(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f >= i64::MIN as f64
                && f < i64::MAX as f64
            {
                *n = Number::from(f as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_as_ints),
        Value::Object(map) => map.values_mut().for_each(integral_floats_as_ints),
        _ => {}
    }
}

/// Serialize without a trailing newline.
pub fn to_json_string(value: &Value, opts: &JsonOpts) -> String {
    let mut normalized = value.clone();
    integral_floats_as_ints(&mut normalized);
    let value = &normalized;
    let unit = opts.indent_unit();
    if opts.compact || unit.is_empty() {
        return value.to_string();
    }
    let mut out = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(unit.as_bytes()));
    // writing into a Vec cannot fail and Value keys are always strings
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

/// Serialize with the trailing newline every written file and printed payload carries.
pub fn render(value: &Value, opts: &JsonOpts) -> String {
    let mut s = to_json_string(value, opts);
    s.push('\n');
    s
}
