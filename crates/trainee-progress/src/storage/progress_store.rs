//! Progress record persistence: one JSON file per record.
//!
//! Each record is stored as `{record_id}.json` inside the base directory.
//! Records are never rewritten or deleted.
//!
//! File format:
//! ```json
//! {
//!     "version": 1,
//!     "record": { ... ProgressRecord ... }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::progress::{NewProgressRecord, ProgressRecord, RecordId};

use super::{create_exclusive, is_entity_file, ProgressStore};

// ── File format constants ─────────────────────────────────────────────────────

const RECORD_FILE_VERSION: u32 = 1;

/// Attempts at claiming a record id before giving up.
const MAX_ID_ATTEMPTS: u32 = 64;

// ── On-disk structure ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct RecordFile {
    version: u32,
    record: ProgressRecord,
}

// ── DirProgressStore ──────────────────────────────────────────────────────────

/// Filesystem-backed, append-only progress store.
///
/// Record ids are claimed by exclusive file creation: an insert takes the
/// highest id on disk plus one and moves on to the next id if another
/// writer got there first.
#[derive(Debug, Clone)]
pub struct DirProgressStore {
    base_dir: PathBuf,
}

impl DirProgressStore {
    /// Create a store rooted at `base_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Io` if the directory cannot be created.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn record_path(&self, id: RecordId) -> PathBuf {
        self.base_dir.join(format!("{}.json", id.0))
    }

    /// Ids of every stored record, in no particular order.
    fn ids(&self) -> Result<Vec<RecordId>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !is_entity_file(&name) {
                continue;
            }
            if let Some(id) = name.strip_suffix(".json").and_then(|s| s.parse().ok()) {
                ids.push(RecordId(id));
            }
        }
        Ok(ids)
    }

    fn read_file(&self, path: &Path) -> Result<ProgressRecord> {
        let bytes = std::fs::read(path)?;
        let file: RecordFile = serde_json::from_slice(&bytes).map_err(|e| {
            TrackerError::InvalidFileFormat(format!(
                "failed to parse record file {}: {e}",
                path.display()
            ))
        })?;
        if file.version != RECORD_FILE_VERSION {
            return Err(TrackerError::InvalidFileFormat(format!(
                "unsupported record file version {} in {}",
                file.version,
                path.display()
            )));
        }
        Ok(file.record)
    }

    fn load_all(&self) -> Result<Vec<ProgressRecord>> {
        self.ids()?
            .into_iter()
            .map(|id| self.read_file(&self.record_path(id)))
            .collect()
    }
}

impl ProgressStore for DirProgressStore {
    fn insert(&self, record: NewProgressRecord) -> Result<ProgressRecord> {
        let mut next = self.ids()?.into_iter().map(|id| id.0).max().unwrap_or(0) + 1;

        for _ in 0..MAX_ID_ATTEMPTS {
            let stored = ProgressRecord::from_new(
                record.clone(),
                RecordId(next),
                crate::time::now_micros(),
            );
            let file = RecordFile {
                version: RECORD_FILE_VERSION,
                record: stored,
            };
            let json = serde_json::to_string_pretty(&file)
                .map_err(|e| TrackerError::SerializationError(e.to_string()))?;

            match create_exclusive(&self.record_path(RecordId(next)), json.as_bytes()) {
                Ok(()) => return Ok(file.record),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    log::debug!("record id {next} taken, retrying");
                    next += 1;
                }
                Err(e) => return Err(TrackerError::Io(e)),
            }
        }

        Err(TrackerError::StorageError(format!(
            "could not claim a record id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    fn get_by_id(&self, id: RecordId) -> Result<Option<ProgressRecord>> {
        match self.read_file(&self.record_path(id)) {
            Ok(record) => Ok(Some(record)),
            Err(TrackerError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list_by_owner(&self, owner: &str) -> Result<Vec<ProgressRecord>> {
        let mut records: Vec<ProgressRecord> = self
            .load_all()?
            .into_iter()
            .filter(|r| r.owner == owner)
            .collect();
        records.sort_by(ProgressRecord::newest_first);
        Ok(records)
    }

    fn list_all(&self) -> Result<Vec<ProgressRecord>> {
        let mut records = self.load_all()?;
        records.sort_by(ProgressRecord::newest_first);
        Ok(records)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
