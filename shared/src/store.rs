//! Crop record storage
//!
//! Stores are keyed by crop name, case-insensitively. They are single-writer:
//! callers serialise mutations, and a read sees the latest committed write.

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::models::{CropRecord, CropRecordPatch};
use crate::validation::validate_crop_name;

pub trait CropRecordStore: Send + Sync {
    fn get(&self, name: &str) -> CoreResult<Option<CropRecord>>;

    /// Insert a new record; fails with `AlreadyExists` for a taken name
    fn put(&mut self, name: &str, record: CropRecord) -> CoreResult<()>;

    /// Merge a partial update; fails with `NotFound` for an unknown name
    fn update(&mut self, name: &str, patch: CropRecordPatch) -> CoreResult<CropRecord>;

    /// Stored names in ascending order
    fn list(&self) -> CoreResult<Vec<String>>;
}

/// Normalised map key for a crop name
pub fn record_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Mapping operations shared by the in-memory and file-backed stores
pub fn insert_record(
    records: &mut BTreeMap<String, CropRecord>,
    name: &str,
    mut record: CropRecord,
) -> CoreResult<()> {
    validate_crop_name(name)?;
    let key = record_key(name);
    if records.contains_key(&key) {
        return Err(CoreError::AlreadyExists(format!("crop '{}'", name.trim())));
    }
    record.name = name.trim().to_string();
    records.insert(key, record);
    Ok(())
}

pub fn patch_record(
    records: &mut BTreeMap<String, CropRecord>,
    name: &str,
    patch: CropRecordPatch,
) -> CoreResult<CropRecord> {
    let record = records
        .get_mut(&record_key(name))
        .ok_or_else(|| CoreError::NotFound(format!("crop '{}'", name.trim())))?;
    record.apply(patch);
    Ok(record.clone())
}

/// Map-backed store without persistence
#[derive(Debug, Clone, Default)]
pub struct InMemoryCropStore {
    records: BTreeMap<String, CropRecord>,
}

impl InMemoryCropStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CropRecordStore for InMemoryCropStore {
    fn get(&self, name: &str) -> CoreResult<Option<CropRecord>> {
        Ok(self.records.get(&record_key(name)).cloned())
    }

    fn put(&mut self, name: &str, record: CropRecord) -> CoreResult<()> {
        insert_record(&mut self.records, name, record)
    }

    fn update(&mut self, name: &str, patch: CropRecordPatch) -> CoreResult<CropRecord> {
        patch_record(&mut self.records, name, patch)
    }

    fn list(&self) -> CoreResult<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }
}
