//! Typed attribute values and the coercion table used by `update`.
//!
//! Records are schema-free at the storage layer, so every attribute carries its
//! own variant. Assigning to an existing attribute converts the incoming value
//! to the attribute's current [`AttrKind`] through [`AttrValue::coerce_to`].

use std::fmt;

use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<AttrValue>),
}

/// The type tag of an [`AttrValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    Str,
    Int,
    Float,
    Bool,
    List,
}

impl AttrKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AttrKind::Str => "string",
            AttrKind::Int => "integer",
            AttrKind::Float => "float",
            AttrKind::Bool => "boolean",
            AttrKind::List => "list",
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{raw}' to {target}")]
pub struct CoerceError {
    raw: String,
    target: AttrKind,
}

impl CoerceError {
    fn new(value: &AttrValue, target: AttrKind) -> Self {
        Self {
            raw: value.to_string(),
            target,
        }
    }

    #[must_use]
    pub fn target(&self) -> AttrKind {
        self.target
    }
}

impl AttrValue {
    #[must_use]
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::Str(_) => AttrKind::Str,
            AttrValue::Int(_) => AttrKind::Int,
            AttrValue::Float(_) => AttrKind::Float,
            AttrValue::Bool(_) => AttrKind::Bool,
            AttrValue::List(_) => AttrKind::List,
        }
    }

    /// Convert `self` into `target`.
    ///
    /// Strings are parsed, numbers widen or truncate toward zero, and anything
    /// can become a string. Lists only accept lists or a string holding a JSON
    /// array.
    pub fn coerce_to(self, target: AttrKind) -> Result<AttrValue, CoerceError> {
        if self.kind() == target {
            return Ok(self);
        }

        let converted = match (&self, target) {
            (_, AttrKind::Str) => Some(AttrValue::Str(self.to_string())),

            (AttrValue::Str(s), AttrKind::Int) => s.trim().parse().ok().map(AttrValue::Int),
            (AttrValue::Float(f), AttrKind::Int) => float_to_int(*f).map(AttrValue::Int),
            (AttrValue::Bool(b), AttrKind::Int) => Some(AttrValue::Int(i64::from(*b))),

            (AttrValue::Str(s), AttrKind::Float) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(AttrValue::Float),
            (AttrValue::Int(i), AttrKind::Float) => Some(AttrValue::Float(*i as f64)),
            (AttrValue::Bool(b), AttrKind::Float) => {
                Some(AttrValue::Float(if *b { 1.0 } else { 0.0 }))
            }

            (AttrValue::Str(s), AttrKind::Bool) => parse_bool(s).map(AttrValue::Bool),
            (AttrValue::Int(i), AttrKind::Bool) => Some(AttrValue::Bool(*i != 0)),
            (AttrValue::Float(f), AttrKind::Bool) => Some(AttrValue::Bool(*f != 0.0)),

            (AttrValue::Str(s), AttrKind::List) => match serde_json::from_str::<Value>(s.trim()) {
                Ok(json @ Value::Array(_)) => AttrValue::from_json(&json),
                _ => None,
            },

            _ => None,
        };

        converted.ok_or_else(|| CoerceError::new(&self, target))
    }

    /// Read an attribute value from JSON. `null` and nested objects have no
    /// attribute representation and yield `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<AttrValue> {
        match value {
            Value::String(s) => Some(AttrValue::Str(s.clone())),
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(AttrValue::Int)
                .or_else(|| n.as_f64().map(AttrValue::Float)),
            Value::Array(items) => items
                .iter()
                .map(AttrValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(AttrValue::List),
            Value::Null | Value::Object(_) => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Str(s) => Value::String(s.clone()),
            AttrValue::Int(i) => Value::Number((*i).into()),
            AttrValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::List(items) => Value::Array(items.iter().map(AttrValue::to_json).collect()),
        }
    }
}

/// Plain rendering: strings are unquoted, floats keep a fractional digit.
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::List(items) => f.write_str(&render_list(items)),
        }
    }
}

fn render_list(items: &[AttrValue]) -> String {
    let rendered: Vec<String> = items.iter().map(|item| item.to_json().to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

fn float_to_int(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
