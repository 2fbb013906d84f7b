//! Health reporting and the manual-reconciliation registry
//!
//! When a compensating refund fails after bounded retries the play is
//! flagged here; the system reports unhealthy until an operator resolves
//! every flag. Flags are never dropped automatically.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One play whose funds require operator attention
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationFlag {
    pub user_id: Uuid,
    /// The debit entry left without a matching credit or refund
    pub debit_entry: Uuid,
    pub reason: String,
    pub flagged_at: DateTime<Utc>,
}

/// Overall system health status
#[derive(Debug, Clone, Serialize)]
pub enum HealthStatus {
    Healthy {
        message: String,
        timestamp: DateTime<Utc>,
    },
    Unhealthy {
        message: String,
        timestamp: DateTime<Utc>,
        pending_reconciliations: usize,
    },
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy { .. })
    }
}

/// Registry of operator-visible state
#[derive(Debug, Default)]
pub struct HealthRegistry {
    flags: Mutex<Vec<ReconciliationFlag>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag a play for manual reconciliation
    pub fn flag_reconciliation(&self, flag: ReconciliationFlag) {
        tracing::error!(
            user_id = %flag.user_id,
            debit_entry = %flag.debit_entry,
            reason = %flag.reason,
            "Play flagged for manual reconciliation"
        );
        self.flags
            .lock()
            .expect("reconciliation registry poisoned")
            .push(flag);
    }

    /// All unresolved flags
    pub fn pending_reconciliations(&self) -> Vec<ReconciliationFlag> {
        self.flags
            .lock()
            .expect("reconciliation registry poisoned")
            .clone()
    }

    /// Mark a flag handled; returns whether anything was removed
    pub fn resolve_reconciliation(&self, debit_entry: Uuid) -> bool {
        let mut flags = self
            .flags
            .lock()
            .expect("reconciliation registry poisoned");
        let before = flags.len();
        flags.retain(|f| f.debit_entry != debit_entry);
        flags.len() < before
    }

    /// Current health, driven by pending reconciliations
    pub fn status(&self) -> HealthStatus {
        let pending = self
            .flags
            .lock()
            .expect("reconciliation registry poisoned")
            .len();
        let timestamp = Utc::now();
        if pending == 0 {
            HealthStatus::Healthy {
                message: "ledger consistent".to_string(),
                timestamp,
            }
        } else {
            HealthStatus::Unhealthy {
                message: format!("{} play(s) awaiting manual reconciliation", pending),
                timestamp,
                pending_reconciliations: pending,
            }
        }
    }
}
