//! Per-game and per-day statistics rollups

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::StatsConfig;
use crate::games::PlayResult;
use crate::wager::{HistoryStore, PlayRecord};

use super::leaderboard::{leaderboard, LeaderboardEntry, Period};

/// Totals over every recorded play
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallStats {
    pub plays: u64,
    pub total_bet: u64,
    pub total_won: u64,
    pub winners: u64,
    pub losers: u64,
    /// `winners / (winners + losers)`, 0 when nothing was played
    pub win_rate: f64,
}

/// Rollup for one game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRollup {
    pub game_id: Uuid,
    pub plays: u64,
    pub total_bet: u64,
    pub total_won: u64,
    pub winners: u64,
    pub losers: u64,
    pub win_rate: f64,
}

/// Rollup for one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRollup {
    pub day: NaiveDate,
    pub plays: u64,
    pub total_bet: u64,
    pub total_won: u64,
    pub winners: u64,
    pub losers: u64,
    pub win_rate: f64,
}

/// Combined statistics response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStatistics {
    pub overall: OverallStats,
    /// Sorted by game id for deterministic output
    pub per_game: Vec<GameRollup>,
    /// Sorted by day ascending
    pub per_day: Vec<DayRollup>,
}

fn win_rate(winners: u64, losers: u64) -> f64 {
    let resolved = winners + losers;
    if resolved == 0 {
        0.0
    } else {
        winners as f64 / resolved as f64
    }
}

/// Build the full statistics response from a set of records
pub fn game_statistics(records: &[PlayRecord], offset_minutes: i32) -> GameStatistics {
    let offset = FixedOffset::east_opt(offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));

    let mut overall = OverallStats::default();
    let mut per_game: BTreeMap<Uuid, GameRollup> = BTreeMap::new();
    let mut per_day: BTreeMap<NaiveDate, DayRollup> = BTreeMap::new();

    for record in records {
        let won = record.kc_delta.max(0) as u64;
        let is_win = record.result == PlayResult::Win;

        overall.plays += 1;
        overall.total_bet = overall.total_bet.saturating_add(record.bet);
        overall.total_won = overall.total_won.saturating_add(won);
        if is_win {
            overall.winners += 1;
        } else {
            overall.losers += 1;
        }

        let game = per_game.entry(record.game_id).or_insert_with(|| GameRollup {
            game_id: record.game_id,
            plays: 0,
            total_bet: 0,
            total_won: 0,
            winners: 0,
            losers: 0,
            win_rate: 0.0,
        });
        game.plays += 1;
        game.total_bet = game.total_bet.saturating_add(record.bet);
        game.total_won = game.total_won.saturating_add(won);
        if is_win {
            game.winners += 1;
        } else {
            game.losers += 1;
        }

        let day = record.created_at.with_timezone(&offset).date_naive();
        let bucket = per_day.entry(day).or_insert_with(|| DayRollup {
            day,
            plays: 0,
            total_bet: 0,
            total_won: 0,
            winners: 0,
            losers: 0,
            win_rate: 0.0,
        });
        bucket.plays += 1;
        bucket.total_bet = bucket.total_bet.saturating_add(record.bet);
        bucket.total_won = bucket.total_won.saturating_add(won);
        if is_win {
            bucket.winners += 1;
        } else {
            bucket.losers += 1;
        }
    }

    overall.win_rate = win_rate(overall.winners, overall.losers);
    let per_game = per_game
        .into_values()
        .map(|mut g| {
            g.win_rate = win_rate(g.winners, g.losers);
            g
        })
        .collect();
    let per_day = per_day
        .into_values()
        .map(|mut d| {
            d.win_rate = win_rate(d.winners, d.losers);
            d
        })
        .collect();

    GameStatistics {
        overall,
        per_game,
        per_day,
    }
}

/// Read-only statistics service over the play history
pub struct StatsAggregator {
    history: Arc<HistoryStore>,
    config: StatsConfig,
    utc_offset_minutes: i32,
}

impl StatsAggregator {
    pub fn new(history: Arc<HistoryStore>, config: StatsConfig, utc_offset_minutes: i32) -> Self {
        Self {
            history,
            config,
            utc_offset_minutes,
        }
    }

    /// Leaderboard for a period using the current wall clock
    pub async fn leaderboard(&self, period: Period, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        self.leaderboard_at(period, limit, Utc::now()).await
    }

    /// Leaderboard for a period at an explicit instant
    pub async fn leaderboard_at(
        &self,
        period: Period,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Vec<LeaderboardEntry> {
        let limit = limit
            .unwrap_or(self.config.default_leaderboard_limit)
            .min(self.config.max_leaderboard_limit);
        let records = self.history.snapshot().await;
        leaderboard(&records, period, limit, now, self.utc_offset_minutes)
    }

    /// Overall, per-game, and per-day rollups
    pub async fn game_statistics(&self) -> GameStatistics {
        let records = self.history.snapshot().await;
        game_statistics(&records, self.utc_offset_minutes)
    }
}
