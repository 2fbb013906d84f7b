//! Daily-spin quota tracking
//!
//! Every user gets a fixed number of free spins per calendar day; further
//! spins cost a flat premium debited like a bet. The day boundary is local
//! midnight under the platform's configured UTC offset, so the tracker is
//! handed the offset and the current instant rather than consulting a
//! clock itself.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::SpinConfig;

/// Whether the next spin is free or costs the premium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinKind {
    Free,
    Premium,
}

/// Spin quota status reported to the caller
#[derive(Debug, Clone, Serialize)]
pub struct SpinStatus {
    pub remaining_free_spins: u32,
    pub last_spin_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct UserSpinState {
    day: NaiveDate,
    used: u32,
    last_spin_at: DateTime<Utc>,
}

/// Tracks per-user spin usage across calendar days
#[derive(Debug, Default)]
pub struct SpinTracker {
    states: HashMap<Uuid, UserSpinState>,
}

impl SpinTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn local_day(now: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
        let offset = FixedOffset::east_opt(offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        now.with_timezone(&offset).date_naive()
    }

    /// Spins already used by the user in the current local day
    fn used_today(&self, user: Uuid, now: DateTime<Utc>, offset_minutes: i32) -> u32 {
        let today = Self::local_day(now, offset_minutes);
        match self.states.get(&user) {
            Some(state) if state.day == today => state.used,
            _ => 0, // quota resets at local midnight
        }
    }

    /// Classify the user's next spin without consuming quota
    pub fn peek(&self, user: Uuid, config: &SpinConfig, now: DateTime<Utc>) -> SpinKind {
        if self.used_today(user, now, config.utc_offset_minutes) < config.free_spins_per_day {
            SpinKind::Free
        } else {
            SpinKind::Premium
        }
    }

    /// Consume one spin; called only after the spin fully settled
    pub fn commit(&mut self, user: Uuid, config: &SpinConfig, now: DateTime<Utc>) {
        let today = Self::local_day(now, config.utc_offset_minutes);
        let state = self.states.entry(user).or_insert(UserSpinState {
            day: today,
            used: 0,
            last_spin_at: now,
        });
        if state.day != today {
            state.day = today;
            state.used = 0;
        }
        state.used += 1;
        state.last_spin_at = now;
    }

    /// Quota status for a user
    pub fn status(&self, user: Uuid, config: &SpinConfig, now: DateTime<Utc>) -> SpinStatus {
        let used = self.used_today(user, now, config.utc_offset_minutes);
        SpinStatus {
            remaining_free_spins: config.free_spins_per_day.saturating_sub(used),
            last_spin_at: self.states.get(&user).map(|s| s.last_spin_at),
        }
    }
}
