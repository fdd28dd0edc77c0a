use std::fmt;

use crate::class::RecordClass;
use crate::ids::RecordId;

/// The sole index of the object store: class tag plus id.
///
/// Rendered as `ClassName.id` only at the snapshot boundary. Parsing splits at
/// the first `.` since class names never contain one, so ids may.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey {
    class: RecordClass,
    id: RecordId,
}

impl StoreKey {
    #[must_use]
    pub fn new(class: RecordClass, id: RecordId) -> Self {
        Self { class, id }
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
    pub fn parse(raw: &str) -> Option<Self> {
        let (class, id) = raw.split_once('.')?;
        let class = RecordClass::from_name(class)?;
        Some(Self::new(class, RecordId::new(id)))
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.id)
    }
}
