//! Object store for Roster records.
//!
//! A keyed registry of live [`Record`](roster_types::Record)s held in memory and
//! persisted as a single JSON document. See [`FileStorage`].

mod error;
mod storage;

pub use error::StoreError;
pub use storage::{DEFAULT_STORE_FILE, FileStorage};
