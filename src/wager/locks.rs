//! Per-user play locks
//!
//! Two concurrent plays by the same user must observe a linear history of
//! balance changes, so the orchestrator serializes the Debit→Credit window
//! behind a per-user async mutex. Different users never share a lock and
//! run fully in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use uuid::Uuid;

/// Registry of per-user locks
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for a user
    ///
    /// The registry mutex is only held long enough to clone the Arc; the
    /// returned lock is awaited outside it.
    pub fn lock_for(&self, user: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("user lock registry poisoned");
        locks.entry(user).or_default().clone()
    }

    /// Number of users with a registered lock
    pub fn len(&self) -> usize {
        self.locks.lock().expect("user lock registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
