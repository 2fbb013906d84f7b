//! Activity counters for the wager orchestrator
//!
//! Simple atomic increments; these are operational metrics, not accounting
//! records, and are never consulted for balance decisions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::games::PlayResult;

/// Counters over orchestrator activity
#[derive(Debug, Default)]
pub struct CoreMetrics {
    plays_total: AtomicU64,
    wins_total: AtomicU64,
    losses_total: AtomicU64,
    spins_total: AtomicU64,
    free_spins_total: AtomicU64,
    compensations_total: AtomicU64,
    reconciliations_total: AtomicU64,
    lock_timeouts_total: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub plays_total: u64,
    pub wins_total: u64,
    pub losses_total: u64,
    pub spins_total: u64,
    pub free_spins_total: u64,
    pub compensations_total: u64,
    pub reconciliations_total: u64,
    pub lock_timeouts_total: u64,
}

impl CoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one resolved wager play
    pub fn record_play(&self, result: PlayResult) {
        self.plays_total.fetch_add(1, Ordering::Relaxed);
        match result {
            PlayResult::Win => self.wins_total.fetch_add(1, Ordering::Relaxed),
            PlayResult::Lose => self.losses_total.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record one settled daily spin
    pub fn record_spin(&self, was_free: bool) {
        self.spins_total.fetch_add(1, Ordering::Relaxed);
        if was_free {
            self.free_spins_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a successful compensating refund
    pub fn record_compensation(&self) {
        self.compensations_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a compensation failure escalated to manual reconciliation
    pub fn record_reconciliation(&self) {
        self.reconciliations_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a play rejected because the user's lock stayed busy
    pub fn record_lock_timeout(&self) {
        self.lock_timeouts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plays_total: self.plays_total.load(Ordering::Relaxed),
            wins_total: self.wins_total.load(Ordering::Relaxed),
            losses_total: self.losses_total.load(Ordering::Relaxed),
            spins_total: self.spins_total.load(Ordering::Relaxed),
            free_spins_total: self.free_spins_total.load(Ordering::Relaxed),
            compensations_total: self.compensations_total.load(Ordering::Relaxed),
            reconciliations_total: self.reconciliations_total.load(Ordering::Relaxed),
            lock_timeouts_total: self.lock_timeouts_total.load(Ordering::Relaxed),
        }
    }
}
