//! Leaderboard computation with deterministic ordering
//!
//! Players are ranked by net winnings inside a calendar window. Ties break
//! by total play count descending, then player id ascending, so the same
//! set of records always produces the same ranking.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::games::PlayResult;
use crate::wager::PlayRecord;

/// Reporting window for leaderboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Since local midnight
    Day,
    /// Since the most recent Monday, local midnight
    Week,
    /// Since day 1 of the current month, local midnight
    Month,
    /// Unbounded
    AllTime,
}

/// One ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub player: Uuid,
    pub net_winnings: i64,
    pub total_bet: u64,
    pub wins: u64,
    pub plays: u64,
}

/// UTC instant where the given period starts, `None` for all-time
pub fn window_start(period: Period, now: DateTime<Utc>, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let offset = FixedOffset::east_opt(offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
    let local_date = now.with_timezone(&offset).date_naive();

    let start_date = match period {
        Period::Day => local_date,
        Period::Week => {
            local_date - Duration::days(local_date.weekday().num_days_from_monday() as i64)
        }
        Period::Month => local_date.with_day(1).unwrap_or(local_date),
        Period::AllTime => return None,
    };

    // Local midnight expressed back in UTC
    let local_midnight = start_date.and_time(NaiveTime::MIN);
    let utc_naive = local_midnight - Duration::seconds(offset.local_minus_utc() as i64);
    Some(Utc.from_utc_datetime(&utc_naive))
}

/// Rank players over the records inside the window
pub fn leaderboard(
    records: &[PlayRecord],
    period: Period,
    limit: usize,
    now: DateTime<Utc>,
    offset_minutes: i32,
) -> Vec<LeaderboardEntry> {
    let start = window_start(period, now, offset_minutes);

    let mut by_player: HashMap<Uuid, LeaderboardEntry> = HashMap::new();
    for record in records {
        if let Some(start) = start {
            if record.created_at < start {
                continue;
            }
        }
        let entry = by_player
            .entry(record.player)
            .or_insert_with(|| LeaderboardEntry {
                player: record.player,
                net_winnings: 0,
                total_bet: 0,
                wins: 0,
                plays: 0,
            });
        entry.net_winnings += record.kc_delta;
        entry.total_bet = entry.total_bet.saturating_add(record.bet);
        if record.result == PlayResult::Win {
            entry.wins += 1;
        }
        entry.plays += 1;
    }

    let mut ranked: Vec<LeaderboardEntry> = by_player.into_values().collect();
    ranked.sort_by(|a, b| {
        b.net_winnings
            .cmp(&a.net_winnings)
            .then(b.plays.cmp(&a.plays))
            .then(a.player.cmp(&b.player))
    });
    ranked.truncate(limit);
    ranked
}
