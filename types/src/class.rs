//! The class registry: every record type the shell knows about.
//!
//! Classes carry no behavior. Each one declares the default attributes it
//! exposes before they are ever assigned. A default takes part in type coercion
//! but is not stored on the record until the operator sets it.

use std::fmt;

use crate::value::AttrKind;

/// Supported record classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordClass {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

const ALL_CLASSES: &[RecordClass] = &[
    RecordClass::BaseModel,
    RecordClass::User,
    RecordClass::State,
    RecordClass::City,
    RecordClass::Amenity,
    RecordClass::Place,
    RecordClass::Review,
];

const USER_DEFAULTS: &[(&str, AttrKind)] = &[
    ("email", AttrKind::Str),
    ("password", AttrKind::Str),
    ("first_name", AttrKind::Str),
    ("last_name", AttrKind::Str),
];

const STATE_DEFAULTS: &[(&str, AttrKind)] = &[("name", AttrKind::Str)];

const CITY_DEFAULTS: &[(&str, AttrKind)] = &[("state_id", AttrKind::Str), ("name", AttrKind::Str)];

const AMENITY_DEFAULTS: &[(&str, AttrKind)] = &[("name", AttrKind::Str)];

const PLACE_DEFAULTS: &[(&str, AttrKind)] = &[
    ("city_id", AttrKind::Str),
    ("user_id", AttrKind::Str),
    ("name", AttrKind::Str),
    ("description", AttrKind::Str),
    ("number_rooms", AttrKind::Int),
    ("number_bathrooms", AttrKind::Int),
    ("max_guest", AttrKind::Int),
    ("price_by_night", AttrKind::Int),
    ("latitude", AttrKind::Float),
    ("longitude", AttrKind::Float),
    ("amenity_ids", AttrKind::List),
];

const REVIEW_DEFAULTS: &[(&str, AttrKind)] = &[
    ("place_id", AttrKind::Str),
    ("user_id", AttrKind::Str),
    ("text", AttrKind::Str),
];

impl RecordClass {
    #[must_use]
    pub const fn all() -> &'static [RecordClass] {
        ALL_CLASSES
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordClass::BaseModel => "BaseModel",
            RecordClass::User => "User",
            RecordClass::State => "State",
            RecordClass::City => "City",
            RecordClass::Amenity => "Amenity",
            RecordClass::Place => "Place",
            RecordClass::Review => "Review",
        }
    }

    /// Look up a class by its exact (case-sensitive) name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_CLASSES
            .iter()
            .copied()
            .find(|class| class.as_str() == name)
    }

    #[must_use]
    pub const fn defaults(self) -> &'static [(&'static str, AttrKind)] {
        match self {
            RecordClass::BaseModel => &[],
            RecordClass::User => USER_DEFAULTS,
            RecordClass::State => STATE_DEFAULTS,
            RecordClass::City => CITY_DEFAULTS,
            RecordClass::Amenity => AMENITY_DEFAULTS,
            RecordClass::Place => PLACE_DEFAULTS,
            RecordClass::Review => REVIEW_DEFAULTS,
        }
    }

    #[must_use]
    pub fn default_kind(self, attr: &str) -> Option<AttrKind> {
        self.defaults()
            .iter()
            .find(|(name, _)| *name == attr)
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
