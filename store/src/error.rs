use std::io;
use std::path::PathBuf;

use roster_types::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("malformed store file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("entry `{key}` in {} has unknown class `{class}`", path.display())]
    UnknownClass {
        path: PathBuf,
        key: String,
        class: String,
    },
    #[error("malformed entry `{key}` in {}: {reason}", path.display())]
    MalformedRecord {
        path: PathBuf,
        key: String,
        reason: String,
    },
}

impl StoreError {
    pub(crate) fn from_record(path: PathBuf, key: &str, err: RecordError) -> Self {
        match err {
            RecordError::UnknownClass(class) => StoreError::UnknownClass {
                path,
                key: key.to_string(),
                class,
            },
            other => StoreError::MalformedRecord {
                path,
                key: key.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
