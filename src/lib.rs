//! Croupier - wagering and KC currency-ledger core for an entertainment platform
//!
//! Croupier provides the money-correct heart of the platform:
//! - An append-only ledger where balances are always derived, never counted
//! - Pure per-variant outcome resolvers over an injected random source
//! - A wager orchestrator with per-user serialization, idempotent replays,
//!   and compensating refunds that escalate to operators when they fail
//! - Read-only leaderboards and statistics over durable play records

pub mod client;
pub mod config;
pub mod error;
pub mod games;
pub mod ledger;
pub mod observability;
pub mod stats;
pub mod wager;

// Re-export commonly used types for convenience
pub use error::{CoreError, CoreResult};

// Re-export the client surface
pub use client::{Caller, CoreClient, Role};

// Re-export configuration interfaces
pub use config::{CoreConfig, SpinConfig, StatsConfig, WagerConfig};

// Re-export the core data model
pub use games::definition::{GameCatalog, GameDefinition, GameStatus, GameTotals};
pub use games::rng::{EntropySource, RandomSource, ScriptedSource, SeededSource};
pub use games::{
    DrawPattern, GameVariant, Outcome, OutcomeDetail, PlayResult, PlayerChoice, RewardDescriptor,
    VariantRules, WeightedReward,
};
pub use ledger::{
    AccountRef, Currency, LedgerEntry, LedgerFilter, LedgerStore, NewEntry, OperationKey, Page,
    PageRequest, RelatedRef, TransactionKind, TransactionStatus,
};
pub use stats::{GameStatistics, LeaderboardEntry, Period, StatsAggregator};
pub use wager::{
    HistoryStore, PlayRecord, PlayReceipt, PlayRequest, SpinReceipt, SpinStatus, WagerOrchestrator,
};
