//! Identity persistence: one JSON file per registered identity.
//!
//! Files are named `{hex(sha256(email))}.json` so arbitrary email text never
//! becomes a path component.
//!
//! File format:
//! ```json
//! {
//!     "version": 1,
//!     "identity": { ... Identity ... }
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, TrackerError};
use crate::identity::Identity;

use super::{create_exclusive, is_entity_file, IdentityStore};

// ── File format constants ─────────────────────────────────────────────────────

const IDENTITY_FILE_VERSION: u32 = 1;

// ── On-disk structure ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct IdentityFile {
    version: u32,
    identity: Identity,
}

// ── DirIdentityStore ──────────────────────────────────────────────────────────

/// Filesystem-backed identity store.
///
/// Registration uses exclusive file creation, so a duplicate email is
/// detected atomically even across processes sharing the directory.
#[derive(Debug, Clone)]
pub struct DirIdentityStore {
    base_dir: PathBuf,
}

impl DirIdentityStore {
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

    fn identity_path(&self, email: &str) -> PathBuf {
        let digest = Sha256::digest(email.as_bytes());
        self.base_dir.join(format!("{}.json", hex::encode(digest)))
    }

    fn read_file(&self, path: &std::path::Path) -> Result<Identity> {
        let bytes = std::fs::read(path)?;
        let file: IdentityFile = serde_json::from_slice(&bytes).map_err(|e| {
            TrackerError::InvalidFileFormat(format!(
                "failed to parse identity file {}: {e}",
                path.display()
            ))
        })?;
        if file.version != IDENTITY_FILE_VERSION {
            return Err(TrackerError::InvalidFileFormat(format!(
                "unsupported identity file version {} in {}",
                file.version,
                path.display()
            )));
        }
        Ok(file.identity)
    }
}

impl IdentityStore for DirIdentityStore {
    fn get_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let path = self.identity_path(email);
        match self.read_file(&path) {
            Ok(identity) => Ok(Some(identity)),
            Err(TrackerError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn insert(&self, identity: Identity) -> Result<Identity> {
        let file = IdentityFile {
            version: IDENTITY_FILE_VERSION,
            identity,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| TrackerError::SerializationError(e.to_string()))?;

        let path = self.identity_path(&file.identity.email);
        match create_exclusive(&path, json.as_bytes()) {
            Ok(()) => Ok(file.identity),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(TrackerError::DuplicateEmail(file.identity.email))
            }
            Err(e) => Err(TrackerError::Io(e)),
        }
    }

    /// Identities ordered by registration time, then email.
    fn list(&self, skip: usize, limit: usize) -> Result<Vec<Identity>> {
        let mut identities = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if is_entity_file(&entry.file_name().to_string_lossy()) {
                identities.push(self.read_file(&entry.path())?);
            }
        }
        identities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.email.cmp(&b.email)));
        Ok(identities.into_iter().skip(skip).take(limit).collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
