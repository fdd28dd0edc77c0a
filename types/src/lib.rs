//! Core domain types for Roster.
//!
//! This crate contains the record model with no IO: identifiers, typed
//! attribute values, the class registry, and the store key.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod class;
mod ids;
mod key;
mod record;
mod value;

pub use class::RecordClass;
pub use ids::RecordId;
pub use key::StoreKey;
pub use record::{
    CLASS_FIELD, Record, RecordError, TIMESTAMP_FORMAT, format_timestamp, is_reserved,
    parse_timestamp,
};
pub use value::{AttrKind, AttrValue, CoerceError};
