//! The record: one typed, identified, timestamped unit of stored data.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::class::RecordClass;
use crate::ids::RecordId;
use crate::key::StoreKey;
use crate::value::{AttrKind, AttrValue};

/// Reserved field naming the concrete class in a record's dict projection.
pub const CLASS_FIELD: &str = "__class__";

/// ISO-8601 with microseconds, as written to the snapshot file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// `%.f` also reads timestamps that were written without a fractional part.
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const RESERVED_FIELDS: &[&str] = &["id", "created_at", "updated_at", CLASS_FIELD];

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("unknown class `{0}`")]
    UnknownClass(String),
    #[error("invalid timestamp for `{field}`: '{raw}'")]
    InvalidTimestamp { field: &'static str, raw: String },
    #[error("attribute `{0}` has no supported value type")]
    MalformedAttribute(String),
    #[error("attribute `{0}` is reserved and cannot be assigned")]
    ReservedAttribute(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    class: RecordClass,
    id: RecordId,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    attributes: BTreeMap<String, AttrValue>,
}

#[must_use]
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<NaiveDateTime, RecordError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_PARSE_FORMAT).map_err(|_| {
        RecordError::InvalidTimestamp {
            field,
            raw: raw.to_string(),
        }
    })
}

#[must_use]
pub fn is_reserved(attr: &str) -> bool {
    RESERVED_FIELDS.contains(&attr)
}

impl Record {
    /// A blank record of `class` with a fresh id and both timestamps set to now.
    #[must_use]
    pub fn new(class: RecordClass) -> Self {
        let now = Local::now().naive_local();
        Self {
            class,
            id: RecordId::generate(),
            created_at: now,
            updated_at: now,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn class(&self) -> RecordClass {
        self.class
    }

    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    #[must_use]
    pub fn key(&self) -> StoreKey {
        StoreKey::new(self.class, self.id.clone())
    }

    #[must_use]
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, AttrValue> {
        &self.attributes
    }

    #[must_use]
    pub fn get(&self, attr: &str) -> Option<&AttrValue> {
        self.attributes.get(attr)
    }

    /// Current type of `attr`: the assigned value's kind, else the class default.
    ///
    /// The reserved fields report `Str`.
    #[must_use]
    pub fn attribute_kind(&self, attr: &str) -> Option<AttrKind> {
        if is_reserved(attr) {
            return Some(AttrKind::Str);
        }
        self.attributes
            .get(attr)
            .map(AttrValue::kind)
            .or_else(|| self.class.default_kind(attr))
    }

    pub fn set(&mut self, attr: impl Into<String>, value: AttrValue) -> Result<(), RecordError> {
        let attr = attr.into();
        if is_reserved(&attr) {
            return Err(RecordError::ReservedAttribute(attr));
        }
        self.attributes.insert(attr, value);
        Ok(())
    }

    /// Mark the record as modified. Never moves `updated_at` backwards.
    pub fn touch(&mut self) {
        let now = Local::now().naive_local();
        self.updated_at = now.max(self.updated_at);
    }

    /// Dict projection: every field plus [`CLASS_FIELD`], with ISO-8601 timestamps.
    #[must_use]
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        for (name, value) in &self.attributes {
            dict.insert(name.clone(), value.to_json());
        }
        dict.insert("id".to_string(), Value::String(self.id.to_string()));
        dict.insert(
            "created_at".to_string(),
            Value::String(format_timestamp(self.created_at)),
        );
        dict.insert(
            "updated_at".to_string(),
            Value::String(format_timestamp(self.updated_at)),
        );
        dict.insert(
            CLASS_FIELD.to_string(),
            Value::String(self.class.as_str().to_string()),
        );
        dict
    }

    /// Rebuild a record from its dict projection, dispatching on [`CLASS_FIELD`].
    pub fn from_dict(dict: &Map<String, Value>) -> Result<Self, RecordError> {
        let class_name = required_str(dict, CLASS_FIELD)?;
        let class = RecordClass::from_name(class_name)
            .ok_or_else(|| RecordError::UnknownClass(class_name.to_string()))?;
        let id = RecordId::new(required_str(dict, "id")?);
        let created_at = parse_timestamp("created_at", required_str(dict, "created_at")?)?;
        let updated_at = parse_timestamp("updated_at", required_str(dict, "updated_at")?)?;

        let mut attributes = BTreeMap::new();
        for (name, raw) in dict {
            if is_reserved(name) {
                continue;
            }
            let value = AttrValue::from_json(raw)
                .ok_or_else(|| RecordError::MalformedAttribute(name.clone()))?;
            attributes.insert(name.clone(), value);
        }

        Ok(Self {
            class,
            id,
            created_at,
            updated_at,
            attributes,
        })
    }

    fn field_map(&self) -> String {
        let mut fields = vec![
            format!("\"id\": {}", Value::String(self.id.to_string())),
            format!(
                "\"created_at\": \"{}\"",
                format_timestamp(self.created_at)
            ),
            format!(
                "\"updated_at\": \"{}\"",
                format_timestamp(self.updated_at)
            ),
        ];
        fields.extend(
            self.attributes
                .iter()
                .map(|(name, value)| format!("{}: {}", Value::String(name.clone()), value.to_json())),
        );
        format!("{{{}}}", fields.join(", "))
    }
}

fn required_str<'a>(
    dict: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, RecordError> {
    dict.get(field)
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingField(field))
}

/// `[ClassName] (id) {field-map}`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {}", self.class, self.id, self.field_map())
    }
}
