//! Crop records persisted as a single JSON object
//!
//! The whole file is read at open and rewritten on every mutation through a
//! temporary file and a rename, so readers never see a partial write. There is
//! no file locking: one process owns the file and serialises its writes.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use shared::store::{insert_record, patch_record, record_key, CropRecordStore};
use shared::{CoreError, CoreResult, CropRecord, CropRecordPatch};

#[derive(Debug)]
pub struct JsonFileCropStore {
    path: PathBuf,
    records: BTreeMap<String, CropRecord>,
}

impl JsonFileCropStore {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let records = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| CoreError::Storage(format!("read {}: {}", path.display(), e)))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                let stored: BTreeMap<String, CropRecord> = serde_json::from_str(&raw)
                    .map_err(|e| CoreError::Storage(format!("parse {}: {}", path.display(), e)))?;
                stored
                    .into_iter()
                    .map(|(name, mut record)| {
                        if record.name.is_empty() {
                            record.name = name.clone();
                        }
                        (record_key(&name), record)
                    })
                    .collect()
            }
        } else {
            BTreeMap::new()
        };

        tracing::info!(path = %path.display(), records = records.len(), "Crop store opened");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &BTreeMap<String, CropRecord>) -> CoreResult<()> {
        let storage = |e: std::io::Error| CoreError::Storage(format!("write {}: {}", self.path.display(), e));
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| CoreError::Storage(format!("serialise crop records: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(storage)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = std::fs::File::create(&tmp).map_err(storage)?;
            file.write_all(body.as_bytes()).map_err(storage)?;
            file.sync_all().map_err(storage)?;
        }
        std::fs::rename(&tmp, &self.path).map_err(storage)?;
        Ok(())
    }

    /// Apply a mutation to a copy, persist it, then commit it in memory
    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut BTreeMap<String, CropRecord>) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut next = self.records.clone();
        let out = op(&mut next)?;
        self.persist(&next)?;
        self.records = next;
        Ok(out)
    }
}

impl CropRecordStore for JsonFileCropStore {
    fn get(&self, name: &str) -> CoreResult<Option<CropRecord>> {
        Ok(self.records.get(&record_key(name)).cloned())
    }

    fn put(&mut self, name: &str, record: CropRecord) -> CoreResult<()> {
        self.mutate(|records| insert_record(records, name, record))?;
        tracing::info!(crop = %name, "Crop record created");
        Ok(())
    }

    fn update(&mut self, name: &str, patch: CropRecordPatch) -> CoreResult<CropRecord> {
        let updated = self.mutate(|records| patch_record(records, name, patch))?;
        tracing::info!(crop = %name, "Crop record updated");
        Ok(updated)
    }

    fn list(&self) -> CoreResult<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }
}
