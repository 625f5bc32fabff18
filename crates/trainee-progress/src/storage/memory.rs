//! In-memory stores.
//!
//! Each store guards a `Vec` with a `std::sync::RwLock`; inserts take the
//! write lock for the whole check-and-append.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, TrackerError};
use crate::identity::Identity;
use crate::progress::{NewProgressRecord, ProgressRecord, RecordId};

use super::{IdentityStore, ProgressStore};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| TrackerError::StorageError("store lock poisoned".into()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| TrackerError::StorageError("store lock poisoned".into()))
}

// ── Identities ────────────────────────────────────────────────────────────────

/// Identities held in registration order.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identities: RwLock<Vec<Identity>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn get_by_email(&self, email: &str) -> Result<Option<Identity>> {
        Ok(read(&self.identities)?
            .iter()
            .find(|i| i.email == email)
            .cloned())
    }

    fn insert(&self, identity: Identity) -> Result<Identity> {
        let mut identities = write(&self.identities)?;
        if identities.iter().any(|i| i.email == identity.email) {
            return Err(TrackerError::DuplicateEmail(identity.email));
        }
        identities.push(identity.clone());
        Ok(identity)
    }

    fn list(&self, skip: usize, limit: usize) -> Result<Vec<Identity>> {
        Ok(read(&self.identities)?
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

// ── Progress records ──────────────────────────────────────────────────────────

/// Records held in insertion order; ids are `len + 1` at insert time.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: RwLock<Vec<ProgressRecord>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn insert(&self, record: NewProgressRecord) -> Result<ProgressRecord> {
        let mut records = write(&self.records)?;
        let id = RecordId(records.len() as u64 + 1);
        let stored = ProgressRecord::from_new(record, id, crate::time::now_micros());
        records.push(stored.clone());
        Ok(stored)
    }

    fn get_by_id(&self, id: RecordId) -> Result<Option<ProgressRecord>> {
        Ok(read(&self.records)?.iter().find(|r| r.id == id).cloned())
    }

    fn list_by_owner(&self, owner: &str) -> Result<Vec<ProgressRecord>> {
        let mut found: Vec<ProgressRecord> = read(&self.records)?
            .iter()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        found.sort_by(ProgressRecord::newest_first);
        Ok(found)
    }

    fn list_all(&self) -> Result<Vec<ProgressRecord>> {
        let mut all = read(&self.records)?.clone();
        all.sort_by(ProgressRecord::newest_first);
        Ok(all)
    }
}
