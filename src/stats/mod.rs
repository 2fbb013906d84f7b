//! Read-only statistics over play history
//!
//! Leaderboards and rollups are reporting, not settlement: they are
//! computed on demand from durable play records and are allowed to be
//! slightly stale relative to in-flight plays.

pub mod aggregator;
pub mod leaderboard;

pub use aggregator::{DayRollup, GameRollup, GameStatistics, OverallStats, StatsAggregator};
pub use leaderboard::{leaderboard, window_start, LeaderboardEntry, Period};
