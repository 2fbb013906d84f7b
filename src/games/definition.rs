//! Game definitions and the catalog that manages them
//!
//! The catalog is the administrative surface: games are seeded at
//! bootstrap, their lifecycle status toggled by operators, and their
//! running totals incremented by the orchestrator. Totals are reporting
//! aggregates only and are never consulted for balance decisions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

use super::{GameVariant, PlayResult, RewardDescriptor, VariantRules, WeightedReward};

/// Lifecycle status of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Running totals maintained incrementally by the orchestrator
///
/// Best-effort aggregates; the ledger remains the only authority for
/// balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTotals {
    pub play_count: u64,
    pub total_wagered: u64,
    pub total_paid_out: u64,
    pub total_winners: u64,
    pub total_losers: u64,
}

impl GameTotals {
    /// Fold one resolved play into the totals
    pub fn record_play(&mut self, bet: u64, paid_out: u64, result: PlayResult) {
        self.play_count += 1;
        self.total_wagered = self.total_wagered.saturating_add(bet);
        self.total_paid_out = self.total_paid_out.saturating_add(paid_out);
        match result {
            PlayResult::Win => self.total_winners += 1,
            PlayResult::Lose => self.total_losers += 1,
        }
    }
}

/// One configured game offered by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDefinition {
    pub id: Uuid,
    /// Stable human-readable identifier, unique within the catalog
    pub slug: String,
    pub name: String,
    pub description: String,
    pub rules: VariantRules,
    pub min_bet: u64,
    pub max_bet: u64,
    pub status: GameStatus,
    pub totals: GameTotals,
    pub created_at: DateTime<Utc>,
}

impl GameDefinition {
    pub fn variant(&self) -> GameVariant {
        self.rules.variant()
    }

    /// Check a bet amount against this game's limits
    pub fn validate_bet(&self, bet: u64) -> CoreResult<()> {
        if bet < self.min_bet || bet > self.max_bet {
            return Err(CoreError::validation_field(
                format!(
                    "bet {} outside [{}, {}] for game {}",
                    bet, self.min_bet, self.max_bet, self.slug
                ),
                "bet",
            ));
        }
        Ok(())
    }
}

/// In-memory catalog of game definitions
#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    games: HashMap<Uuid, GameDefinition>,
}

impl GameCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    /// Create a catalog seeded with the default game set, one per variant
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for definition in default_games() {
            // Seeded definitions are internally consistent by construction
            let _ = catalog.insert(definition);
        }
        catalog
    }

    /// Add a game definition, validating its rules first
    pub fn insert(&mut self, definition: GameDefinition) -> CoreResult<()> {
        definition.rules.validate()?;
        if definition.min_bet > definition.max_bet {
            return Err(CoreError::validation_field(
                "min_bet must not exceed max_bet",
                "min_bet",
            ));
        }
        if self.games.values().any(|g| g.slug == definition.slug) {
            return Err(CoreError::validation_field(
                format!("slug {:?} already in catalog", definition.slug),
                "slug",
            ));
        }
        self.games.insert(definition.id, definition);
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> Option<&GameDefinition> {
        self.games.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut GameDefinition> {
        self.games.get_mut(id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&GameDefinition> {
        self.games.values().find(|g| g.slug == slug)
    }

    /// First game of the given variant regardless of status, if any
    pub fn find_by_variant(&self, variant: GameVariant) -> Option<&GameDefinition> {
        let mut candidates: Vec<&GameDefinition> = self
            .games
            .values()
            .filter(|g| g.variant() == variant)
            .collect();
        // Stable pick when multiple games share a variant
        candidates.sort_by_key(|g| g.id);
        candidates.first().copied()
    }

    /// First active game of the given variant, if any
    pub fn find_active_by_variant(&self, variant: GameVariant) -> Option<&GameDefinition> {
        let mut candidates: Vec<&GameDefinition> = self
            .games
            .values()
            .filter(|g| g.variant() == variant && g.status == GameStatus::Active)
            .collect();
        candidates.sort_by_key(|g| g.id);
        candidates.first().copied()
    }

    /// All games, sorted by slug for deterministic listings
    pub fn all(&self) -> Vec<&GameDefinition> {
        let mut games: Vec<&GameDefinition> = self.games.values().collect();
        games.sort_by(|a, b| a.slug.cmp(&b.slug));
        games
    }

    /// Change a game's lifecycle status
    pub fn set_status(&mut self, id: &Uuid, status: GameStatus) -> CoreResult<()> {
        match self.games.get_mut(id) {
            Some(game) => {
                game.status = status;
                Ok(())
            }
            None => Err(CoreError::NotFound {
                entity: "game",
                id: id.to_string(),
            }),
        }
    }

    /// Fold a resolved play into a game's running totals
    pub fn record_play(
        &mut self,
        id: &Uuid,
        bet: u64,
        paid_out: u64,
        result: PlayResult,
    ) -> CoreResult<()> {
        match self.games.get_mut(id) {
            Some(game) => {
                game.totals.record_play(bet, paid_out, result);
                Ok(())
            }
            None => Err(CoreError::NotFound {
                entity: "game",
                id: id.to_string(),
            }),
        }
    }
}

/// The default game set seeded at bootstrap
pub fn default_games() -> Vec<GameDefinition> {
    let now = Utc::now();
    vec![
        GameDefinition {
            id: Uuid::new_v4(),
            slug: "number-guess".to_string(),
            name: "Number Guess".to_string(),
            description: "Pick a number from 1 to 10 and beat the draw.".to_string(),
            rules: VariantRules::NumberGuess {
                min_number: 1,
                max_number: 10,
                multiplier_bps: 90_000, // 9.0x on a 1-in-10 guess
            },
            min_bet: 10,
            max_bet: 10_000,
            status: GameStatus::Active,
            totals: GameTotals::default(),
            created_at: now,
        },
        GameDefinition {
            id: Uuid::new_v4(),
            slug: "lucky7".to_string(),
            name: "Lucky 7".to_string(),
            description: "Three draws from 1 to 7. Sevens, trips, or a straight pay out."
                .to_string(),
            rules: VariantRules::TripleDraw {
                three_sevens_bps: 70_000,
                three_of_a_kind_bps: 30_000,
                straight_bps: 20_000,
            },
            min_bet: 10,
            max_bet: 5_000,
            status: GameStatus::Active,
            totals: GameTotals::default(),
            created_at: now,
        },
        GameDefinition {
            id: Uuid::new_v4(),
            slug: "coin-flip".to_string(),
            name: "Coin Flip".to_string(),
            description: "Heads or tails at 1.95x.".to_string(),
            rules: VariantRules::CoinFlip {
                sides: ["heads".to_string(), "tails".to_string()],
                multiplier_bps: 19_500,
            },
            min_bet: 10,
            max_bet: 20_000,
            status: GameStatus::Active,
            totals: GameTotals::default(),
            created_at: now,
        },
        GameDefinition {
            id: Uuid::new_v4(),
            slug: "daily-spin".to_string(),
            name: "Daily Spin".to_string(),
            description: "Spin the wheel for a guaranteed reward.".to_string(),
            rules: VariantRules::DailySpin {
                rewards: vec![
                    WeightedReward {
                        reward: RewardDescriptor {
                            code: "kc_10".to_string(),
                            kc_amount: 10,
                        },
                        weight: 50,
                    },
                    WeightedReward {
                        reward: RewardDescriptor {
                            code: "kc_25".to_string(),
                            kc_amount: 25,
                        },
                        weight: 30,
                    },
                    WeightedReward {
                        reward: RewardDescriptor {
                            code: "kc_100".to_string(),
                            kc_amount: 100,
                        },
                        weight: 15,
                    },
                    WeightedReward {
                        reward: RewardDescriptor {
                            code: "kc_1000".to_string(),
                            kc_amount: 1_000,
                        },
                        weight: 5,
                    },
                ],
            },
            min_bet: 0,
            max_bet: 0,
            status: GameStatus::Active,
            totals: GameTotals::default(),
            created_at: now,
        },
    ]
}
