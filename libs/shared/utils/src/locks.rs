use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-practitioner mutual exclusion for availability writes.
///
/// Validation reads the practitioner's schedules across every clinic and
/// commits in a separate write, so two concurrent edits at different
/// clinics could both pass validation and double-book the practitioner.
/// Every availability write must hold the practitioner's lock across
/// read, validation and commit.
pub struct PractitionerLocks {
    inner: std::sync::Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl PractitionerLocks {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the lock for one practitioner, waiting if another write
    /// for the same practitioner is in flight.
    pub async fn acquire(&self, practitioner_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            map.entry(practitioner_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}

impl Default for PractitionerLocks {
    fn default() -> Self {
        Self::new()
    }
}
