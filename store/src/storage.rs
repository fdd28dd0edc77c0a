//! File-backed object store.
//!
//! Every mutation is followed by [`FileStorage::persist`], which rewrites the
//! whole collection. A reload replaces the in-memory registry wholesale.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use roster_types::{Record, RecordClass, StoreKey};
use roster_utils::{atomic_write, recover_bak_file};
use serde_json::{Map, Value};

use crate::StoreError;

/// Snapshot file used when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "file.json";

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    objects: BTreeMap<StoreKey, Record>,
}

impl FileStorage {
    /// An empty store bound to `path`. Nothing is read until [`load`](Self::load).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: BTreeMap::new(),
        }
    }

    /// Construct the store and load any existing snapshot.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut storage = Self::new(path);
        storage.load()?;
        Ok(storage)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live collection.
    #[must_use]
    pub fn all(&self) -> &BTreeMap<StoreKey, Record> {
        &self.objects
    }

    /// The live collection, for callers that mutate records in place.
    pub fn all_mut(&mut self) -> &mut BTreeMap<StoreKey, Record> {
        &mut self.objects
    }

    /// Insert or overwrite the entry for `record`.
    pub fn register(&mut self, record: Record) -> StoreKey {
        let key = record.key();
        self.objects.insert(key.clone(), record);
        key
    }

    /// Create a blank record of `class`, register it, and persist.
    ///
    /// If the write fails the record is unregistered again, so the registry
    /// never holds an entry whose id was not reported.
    pub fn create(&mut self, class: RecordClass) -> Result<StoreKey, StoreError> {
        let key = self.register(Record::new(class));
        if let Err(err) = self.persist() {
            self.objects.remove(&key);
            return Err(err);
        }
        tracing::debug!(key = %key, "Created record");
        Ok(key)
    }

    #[must_use]
    pub fn get(&self, key: &StoreKey) -> Option<&Record> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &StoreKey) -> Option<&mut Record> {
        self.objects.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: &StoreKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Remove an entry. The caller decides when to persist.
    pub fn remove(&mut self, key: &StoreKey) -> Option<Record> {
        self.objects.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Records whose class is exactly `class`.
    pub fn iter_class(&self, class: RecordClass) -> impl Iterator<Item = &Record> {
        self.objects
            .iter()
            .filter(move |(key, _)| key.class() == class)
            .map(|(_, record)| record)
    }

    #[must_use]
    pub fn count(&self, class: RecordClass) -> usize {
        self.objects.keys().filter(|key| key.class() == class).count()
    }

    /// Serialize the full registry and replace the snapshot file.
    pub fn persist(&self) -> Result<(), StoreError> {
        let snapshot: Map<String, Value> = self
            .objects
            .iter()
            .map(|(key, record)| (key.to_string(), Value::Object(record.to_dict())))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot).map_err(StoreError::Serialize)?;

        atomic_write(&self.path, json.as_bytes()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            entries = self.objects.len(),
            "Persisted store"
        );
        Ok(())
    }

    /// Replace the registry with the snapshot on disk.
    ///
    /// A missing file means there is no prior state and leaves the registry
    /// untouched. Any unreadable entry fails the whole load, as does an entry
    /// stored under a key other than its own `Class.id`; nothing is merged and
    /// nothing is skipped.
    pub fn load(&mut self) -> Result<(), StoreError> {
        recover_bak_file(&self.path);
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No store file; starting empty");
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let snapshot: Map<String, Value> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let mut objects = BTreeMap::new();
        for (raw_key, entry) in &snapshot {
            let Value::Object(dict) = entry else {
                return Err(StoreError::MalformedRecord {
                    path: self.path.clone(),
                    key: raw_key.clone(),
                    reason: "entry is not an object".to_string(),
                });
            };
            let record = Record::from_dict(dict)
                .map_err(|err| StoreError::from_record(self.path.clone(), raw_key, err))?;
            let key = record.key();
            if key.to_string() != *raw_key {
                return Err(StoreError::MalformedRecord {
                    path: self.path.clone(),
                    key: raw_key.clone(),
                    reason: format!("key does not match record class and id (`{key}`)"),
                });
            }
            objects.insert(key, record);
        }

        self.objects = objects;
        tracing::info!(
            path = %self.path.display(),
            entries = self.objects.len(),
            "Loaded store"
        );
        Ok(())
    }
}
