//! Client facade over the wagering core
//!
//! [`CoreClient`] is the surface the rest of the platform talks to. Every
//! call arrives with an authenticated [`Caller`] supplied by the identity
//! subsystem; the core trusts it and never re-authenticates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::games::definition::{GameCatalog, GameDefinition, GameStatus};
use crate::games::rng::{EntropySource, RandomSource};
use crate::games::GameVariant;
use crate::ledger::{LedgerEntry, LedgerStore, Page, PageRequest};
use crate::observability::{CoreMetrics, HealthRegistry};
use crate::stats::{GameStatistics, LeaderboardEntry, Period, StatsAggregator};
use crate::wager::{
    PlayRecord, PlayReceipt, PlayRequest, SpinReceipt, SpinStatus, WagerOrchestrator,
};

/// Authenticated identity attached to every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

/// Role granted by the identity subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Admin,
}

impl Caller {
    pub fn player(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Player,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    fn require_admin(&self) -> CoreResult<()> {
        if self.role != Role::Admin {
            return Err(CoreError::validation_field(
                "admin role required",
                "caller.role",
            ));
        }
        Ok(())
    }
}

/// Facade wiring the orchestrator, ledger, and statistics together
pub struct CoreClient {
    orchestrator: Arc<WagerOrchestrator>,
    stats: StatsAggregator,
    max_page_limit: u32,
}

impl CoreClient {
    /// Build a client with the default catalog and OS-entropy randomness
    pub fn new(config: &CoreConfig) -> Self {
        Self::with_parts(
            config,
            GameCatalog::with_defaults(),
            Box::new(EntropySource::new()),
        )
    }

    /// Build a client with an explicit catalog and random source
    pub fn with_parts(
        config: &CoreConfig,
        catalog: GameCatalog,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let orchestrator = Arc::new(WagerOrchestrator::new(config, catalog, rng));
        let stats = StatsAggregator::new(
            orchestrator.history().clone(),
            config.stats.clone(),
            config.spin.utc_offset_minutes,
        );
        Self {
            orchestrator,
            stats,
            max_page_limit: config.wager.max_page_limit,
        }
    }

    /// The orchestrator, for callers composing lower-level flows
    pub fn orchestrator(&self) -> &Arc<WagerOrchestrator> {
        &self.orchestrator
    }

    /// The ledger store, reused directly by gift and payment flows
    pub fn ledger(&self) -> &Arc<LedgerStore> {
        self.orchestrator.ledger()
    }

    pub fn metrics(&self) -> &Arc<CoreMetrics> {
        self.orchestrator.metrics()
    }

    pub fn health(&self) -> &Arc<HealthRegistry> {
        self.orchestrator.health()
    }

    /// Play one wager game
    pub async fn play_game(&self, caller: Caller, request: PlayRequest) -> CoreResult<PlayReceipt> {
        self.orchestrator.play_game(caller.user_id, request).await
    }

    /// Current KC balance
    pub async fn balance(&self, caller: Caller) -> u64 {
        self.orchestrator.ledger().balance(caller.user_id).await
    }

    /// Remaining free spins and last spin time
    pub async fn daily_spin_status(&self, caller: Caller) -> SpinStatus {
        self.orchestrator.daily_spin_status(caller.user_id).await
    }

    /// Play the daily spin
    pub async fn play_daily_spin(
        &self,
        caller: Caller,
        operation_id: Uuid,
    ) -> CoreResult<SpinReceipt> {
        self.orchestrator
            .play_daily_spin(caller.user_id, operation_id)
            .await
    }

    /// The caller's play history, newest first
    pub async fn play_history(
        &self,
        caller: Caller,
        variant: Option<GameVariant>,
        page: PageRequest,
    ) -> CoreResult<Page<PlayRecord>> {
        if page.limit > self.max_page_limit {
            return Err(CoreError::validation_field(
                format!("limit exceeds maximum of {}", self.max_page_limit),
                "limit",
            ));
        }
        self.orchestrator
            .history()
            .list_for_player(caller.user_id, variant, page)
            .await
    }

    /// The caller's ledger entries, newest first
    pub async fn ledger_entries(
        &self,
        caller: Caller,
        filter: &crate::ledger::LedgerFilter,
        page: PageRequest,
    ) -> CoreResult<Page<LedgerEntry>> {
        if page.limit > self.max_page_limit {
            return Err(CoreError::validation_field(
                format!("limit exceeds maximum of {}", self.max_page_limit),
                "limit",
            ));
        }
        let mut filter = filter.clone();
        // Callers only ever see their own entries
        filter.account = Some(crate::ledger::AccountRef::User(caller.user_id));
        self.orchestrator.ledger().list(&filter, page).await
    }

    /// Ranked leaderboard for a period
    pub async fn leaderboard(
        &self,
        period: Period,
        limit: Option<usize>,
    ) -> Vec<LeaderboardEntry> {
        self.stats.leaderboard(period, limit).await
    }

    /// Overall, per-game, and per-day statistics
    pub async fn game_statistics(&self) -> GameStatistics {
        self.stats.game_statistics().await
    }

    /// All configured games, sorted by slug
    pub async fn games(&self) -> Vec<GameDefinition> {
        let catalog = self.orchestrator.catalog().read().await;
        catalog.all().into_iter().cloned().collect()
    }

    /// Change a game's lifecycle status (admin only)
    pub async fn set_game_status(
        &self,
        caller: Caller,
        game_id: Uuid,
        status: GameStatus,
    ) -> CoreResult<()> {
        caller.require_admin()?;
        let mut catalog = self.orchestrator.catalog().write().await;
        catalog.set_status(&game_id, status)
    }

    /// Record a gift transfer on behalf of the social subsystem
    pub async fn record_gift(
        &self,
        sender: Caller,
        recipient: Uuid,
        amount: u64,
        gift_id: Uuid,
    ) -> CoreResult<LedgerEntry> {
        self.orchestrator
            .ledger()
            .record_gift(sender.user_id, recipient, amount, gift_id)
            .await
    }
}
