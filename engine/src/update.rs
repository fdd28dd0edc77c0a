//! Attribute-update engine.
//!
//! Extracts the value of a single-attribute update, recognizes dictionary
//! literals for batch updates, and coerces every assignment to the target
//! attribute's current type before anything is written.

use std::sync::LazyLock;

use regex::Regex;
use roster_types::{AttrKind, AttrValue, Record, RecordError, is_reserved};
use serde_json::{Map, Value};

use crate::EngineError;
use crate::grammar::{is_balanced, split_top_level};

static QUOTED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("quoted-span regex is valid"));

static DICT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"[^"]*"\s*:\s*\S"#).expect("dict-entry regex is valid"));

/// The value of `update <Class> <id> <attr> <value...>` from its tokens.
///
/// A value that starts with `"` may span tokens; the first complete quoted span
/// of the joined tokens is taken. Without one, the first token is used as is.
#[must_use]
pub fn extract_value(tokens: &[&str]) -> Option<String> {
    let first = *tokens.first()?;
    if !first.starts_with('"') {
        return Some(first.to_string());
    }
    let joined = tokens.join(" ");
    let value = QUOTED_SPAN
        .captures(&joined)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| first.to_string(), |span| span.as_str().to_string());
    Some(value)
}

/// Structural check for a dictionary literal: outer braces, balanced nesting,
/// and `"key": value` entries.
#[must_use]
pub fn is_dictionary(raw: &str) -> bool {
    let trimmed = raw.trim();
    let Some(body) = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return false;
    };
    if !is_balanced(body) {
        return false;
    }
    if body.trim().is_empty() {
        return true;
    }
    split_top_level(body)
        .iter()
        .all(|entry| DICT_ENTRY.is_match(entry))
}

/// Parse a dictionary literal into attribute assignments.
///
/// `None` when the literal fails the structural check, is not valid JSON, or
/// holds a value with no attribute representation.
#[must_use]
pub fn parse_dictionary(raw: &str) -> Option<Vec<(String, AttrValue)>> {
    if !is_dictionary(raw) {
        return None;
    }
    let map: Map<String, Value> = serde_json::from_str(raw.trim()).ok()?;
    map.iter()
        .map(|(name, value)| AttrValue::from_json(value).map(|value| (name.clone(), value)))
        .collect()
}

/// Coerce every assignment against `record` without touching it.
///
/// Existing attributes (assigned or class default) keep their type; new ones
/// are stored as strings. The first failure rejects the whole batch.
pub fn coerce_assignments(
    record: &Record,
    assignments: Vec<(String, AttrValue)>,
) -> Result<Vec<(String, AttrValue)>, EngineError> {
    assignments
        .into_iter()
        .map(|(name, value)| {
            if is_reserved(&name) {
                return Err(RecordError::ReservedAttribute(name).into());
            }
            let kind = record.attribute_kind(&name).unwrap_or(AttrKind::Str);
            match value.coerce_to(kind) {
                Ok(value) => Ok((name, value)),
                Err(source) => Err(EngineError::Coercion { attr: name, source }),
            }
        })
        .collect()
}
