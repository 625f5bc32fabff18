//! Storage layer for identities and progress records.
//!
//! Two interchangeable backends implement the store traits:
//!
//! - [`memory`]: `RwLock`-guarded vectors, for tests and embedding.
//! - [`identity_store`] and [`progress_store`]: one versioned JSON file per
//!   entity under a base directory.
//!
//! # Directory layout
//!
//! ```text
//! {data_dir}/
//! ├── identities/
//! │   └── {sha256(email) hex}.json
//! └── progress/
//!     └── {record_id}.json
//! ```
//!
//! Inserts are atomic in both backends: two concurrent registrations of one
//! email cannot both succeed, and two concurrent submissions never share a
//! record id.

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::identity::Identity;
use crate::progress::{NewProgressRecord, ProgressRecord, RecordId};

pub mod identity_store;
pub mod memory;
pub mod progress_store;

pub use identity_store::DirIdentityStore;
pub use memory::{MemoryIdentityStore, MemoryProgressStore};
pub use progress_store::DirProgressStore;

/// Holds registered identities, keyed by email.
pub trait IdentityStore: Send + Sync {
    /// Look up an identity by email.
    fn get_by_email(&self, email: &str) -> Result<Option<Identity>>;

    /// Insert a new identity.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DuplicateEmail` if the email is taken.
    fn insert(&self, identity: Identity) -> Result<Identity>;

    /// Page through identities in registration order.
    fn list(&self, skip: usize, limit: usize) -> Result<Vec<Identity>>;
}

/// Append-only history of progress records.
pub trait ProgressStore: Send + Sync {
    /// Insert a record, assigning its id and creation timestamp.
    fn insert(&self, record: NewProgressRecord) -> Result<ProgressRecord>;

    fn get_by_id(&self, id: RecordId) -> Result<Option<ProgressRecord>>;

    /// Records owned by `owner`, newest first.
    fn list_by_owner(&self, owner: &str) -> Result<Vec<ProgressRecord>>;

    /// Every record, newest first.
    fn list_all(&self) -> Result<Vec<ProgressRecord>>;
}

// ── Shared file helpers ───────────────────────────────────────────────────────

/// Write `bytes` to `path` only if `path` does not exist yet.
///
/// The content is written to a temporary sibling first and then hard-linked
/// into place, so readers never see a partial file. Fails with
/// `std::io::ErrorKind::AlreadyExists` if `path` is taken.
pub(crate) fn create_exclusive(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = dir.join(format!(".{}.tmp", crate::crypto::random::random_hex_8()));

    let written = (|| {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        std::fs::hard_link(&tmp, path)
    })();

    let _ = std::fs::remove_file(&tmp);
    written
}

/// Whether a directory entry name is a stored entity file.
pub(crate) fn is_entity_file(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(".json")
}
