//! Wager orchestration: the debit → resolve → credit state machine
//!
//! One play runs Validate → CheckBalance → Debit → Resolve → Credit(if
//! win) → RecordHistory → UpdateGameStats. Everything before Debit fails
//! with no side effects; once the debit lands, the play runs to completion
//! or to a compensating refund. A failed refund escalates to an
//! operator-visible reconciliation flag — never to a silent retry loop and
//! never to a success response.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{CoreConfig, SpinConfig, WagerConfig};
use crate::error::{CoreError, CoreResult};
use crate::games::definition::{GameCatalog, GameStatus};
use crate::games::rng::RandomSource;
use crate::games::{
    self, payout, GameVariant, Outcome, OutcomeDetail, PlayResult, PlayerChoice, RewardDescriptor,
    VariantRules,
};
use crate::ledger::{
    AccountRef, Currency, LedgerEntry, LedgerStore, NewEntry, OperationKey, RelatedRef,
    TransactionKind,
};
use crate::observability::{CoreMetrics, HealthRegistry, ReconciliationFlag};

use super::history::{HistoryStore, PlayRecord};
use super::locks::UserLocks;
use super::spin::{SpinKind, SpinStatus, SpinTracker};

/// One wager play request
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub game_id: Uuid,
    pub bet: u64,
    pub choice: PlayerChoice,
    /// Client-generated idempotency key; replays return the original receipt
    pub operation_id: Uuid,
}

/// Result of a settled wager play
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayReceipt {
    pub play_id: Uuid,
    pub game_id: Uuid,
    pub result: PlayResult,
    pub kc_delta: i64,
    pub balance_after: u64,
    pub detail: OutcomeDetail,
}

/// Result of a settled daily spin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinReceipt {
    pub play_id: Uuid,
    pub reward: RewardDescriptor,
    pub was_free: bool,
    pub balance_after: u64,
}

/// Coordinates plays across the ledger, outcome engine, and history
pub struct WagerOrchestrator {
    ledger: Arc<LedgerStore>,
    catalog: Arc<RwLock<GameCatalog>>,
    history: Arc<HistoryStore>,
    locks: UserLocks,
    spins: Mutex<SpinTracker>,
    rng: Mutex<Box<dyn RandomSource>>,
    wager_config: WagerConfig,
    spin_config: SpinConfig,
    metrics: Arc<CoreMetrics>,
    health: Arc<HealthRegistry>,
    /// Settled plays by operation key, for idempotent replays
    completed_plays: RwLock<HashMap<OperationKey, PlayReceipt>>,
    completed_spins: RwLock<HashMap<OperationKey, SpinReceipt>>,
}

impl WagerOrchestrator {
    /// Create an orchestrator over fresh stores
    pub fn new(config: &CoreConfig, catalog: GameCatalog, rng: Box<dyn RandomSource>) -> Self {
        Self {
            ledger: Arc::new(LedgerStore::new()),
            catalog: Arc::new(RwLock::new(catalog)),
            history: Arc::new(HistoryStore::new()),
            locks: UserLocks::new(),
            spins: Mutex::new(SpinTracker::new()),
            rng: Mutex::new(rng),
            wager_config: config.wager.clone(),
            spin_config: config.spin.clone(),
            metrics: Arc::new(CoreMetrics::new()),
            health: Arc::new(HealthRegistry::new()),
            completed_plays: RwLock::new(HashMap::new()),
            completed_spins: RwLock::new(HashMap::new()),
        }
    }

    /// The ledger this orchestrator settles against
    pub fn ledger(&self) -> &Arc<LedgerStore> {
        &self.ledger
    }

    /// The game catalog, shared with administrative callers
    pub fn catalog(&self) -> &Arc<RwLock<GameCatalog>> {
        &self.catalog
    }

    /// The play-history store
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn metrics(&self) -> &Arc<CoreMetrics> {
        &self.metrics
    }

    pub fn health(&self) -> &Arc<HealthRegistry> {
        &self.health
    }

    /// Play one wager game
    pub async fn play_game(&self, user: Uuid, request: PlayRequest) -> CoreResult<PlayReceipt> {
        let operation = OperationKey {
            user_id: user,
            operation_id: request.operation_id,
        };

        // Replayed operation: hand back the original receipt
        if let Some(receipt) = self.completed_plays.read().await.get(&operation) {
            debug!(user_id = %user, operation_id = %operation.operation_id, "Replayed play operation");
            return Ok(receipt.clone());
        }

        // Validate: game exists, is active, bet and choice are well-formed.
        // Nothing is mutated until every check passes.
        let (game_id, rules) = self.validated_game(&request).await?;

        // Serialize this user's debit→credit window
        let lock = self.locks.lock_for(user);
        let guard = match timeout(
            Duration::from_millis(self.wager_config.lock_wait_ms),
            lock.lock(),
        )
        .await
        {
            Ok(guard) => guard,
            Err(_) => {
                self.metrics.record_lock_timeout();
                return Err(CoreError::ConcurrencyConflict {
                    message: format!("user {} play lock stayed busy", user),
                    attempts: 1,
                });
            }
        };

        // The same operation may have settled while we waited on the lock
        if let Some(receipt) = self.completed_plays.read().await.get(&operation) {
            return Ok(receipt.clone());
        }

        let balance_before = self.ledger.balance(user).await;
        if balance_before < request.bet {
            return Err(CoreError::InsufficientBalance {
                required: request.bet,
                available: balance_before,
            });
        }

        // Debit the stake
        let debit = self
            .ledger
            .append(NewEntry {
                kind: TransactionKind::WagerDebit,
                currency: Currency::Kc,
                amount: request.bet,
                sender: AccountRef::User(user),
                recipient: Some(AccountRef::House),
                related: Some(RelatedRef::Game(game_id)),
                operation: Some(operation),
            })
            .await?;

        // Resolve the outcome; pure computation over the injected source
        let outcome = {
            let mut rng = self.rng.lock().await;
            games::resolve(&rules, &request.choice, rng.as_mut())
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => {
                self.compensate(user, &debit, "outcome resolution failed")
                    .await?;
                return Err(error);
            }
        };

        // Credit the payout on a win
        let paid_out = match outcome.result {
            PlayResult::Win => payout(request.bet, outcome.multiplier_bps),
            PlayResult::Lose => 0,
        };
        if paid_out > 0 {
            if let Err(error) = self
                .ledger
                .append(NewEntry {
                    kind: TransactionKind::WagerCredit,
                    currency: Currency::Kc,
                    amount: paid_out,
                    sender: AccountRef::House,
                    recipient: Some(AccountRef::User(user)),
                    related: Some(RelatedRef::Game(game_id)),
                    operation: None,
                })
                .await
            {
                self.compensate(user, &debit, "payout credit failed").await?;
                return Err(error);
            }
        }

        let balance_after = self.ledger.balance(user).await;
        let kc_delta = paid_out as i64 - request.bet as i64;

        let receipt = self
            .settle(
                user,
                game_id,
                request.bet,
                paid_out,
                balance_before,
                balance_after,
                &outcome,
            )
            .await;

        self.metrics.record_play(outcome.result);
        info!(
            user_id = %user,
            game_id = %game_id,
            bet = request.bet,
            result = ?outcome.result,
            kc_delta,
            balance_after,
            "Play settled"
        );

        self.completed_plays
            .write()
            .await
            .insert(operation, receipt.clone());
        drop(guard);

        Ok(receipt)
    }

    /// Play the daily spin using the current wall clock
    pub async fn play_daily_spin(&self, user: Uuid, operation_id: Uuid) -> CoreResult<SpinReceipt> {
        self.play_daily_spin_at(user, operation_id, Utc::now()).await
    }

    /// Play the daily spin at an explicit instant
    ///
    /// The instant drives quota bucketing only; embedding services pass
    /// their own clock in tests.
    pub async fn play_daily_spin_at(
        &self,
        user: Uuid,
        operation_id: Uuid,
        now: DateTime<Utc>,
    ) -> CoreResult<SpinReceipt> {
        let operation = OperationKey {
            user_id: user,
            operation_id,
        };

        if let Some(receipt) = self.completed_spins.read().await.get(&operation) {
            debug!(user_id = %user, operation_id = %operation_id, "Replayed spin operation");
            return Ok(receipt.clone());
        }

        // The spin game must exist and be active
        let (game_id, rewards) = {
            let catalog = self.catalog.read().await;
            let game = catalog
                .find_by_variant(GameVariant::DailySpin)
                .ok_or(CoreError::NotFound {
                    entity: "game",
                    id: "daily-spin".to_string(),
                })?;
            if game.status != GameStatus::Active {
                return Err(CoreError::GameUnavailable {
                    game_id: game.id,
                    reason: format!("status {:?}", game.status),
                });
            }
            match &game.rules {
                VariantRules::DailySpin { rewards } => (game.id, rewards.clone()),
                other => {
                    return Err(CoreError::validation(format!(
                        "daily-spin game configured with {} rules",
                        other.variant().as_str()
                    )))
                }
            }
        };

        let lock = self.locks.lock_for(user);
        let guard = match timeout(
            Duration::from_millis(self.wager_config.lock_wait_ms),
            lock.lock(),
        )
        .await
        {
            Ok(guard) => guard,
            Err(_) => {
                self.metrics.record_lock_timeout();
                return Err(CoreError::ConcurrencyConflict {
                    message: format!("user {} play lock stayed busy", user),
                    attempts: 1,
                });
            }
        };

        if let Some(receipt) = self.completed_spins.read().await.get(&operation) {
            return Ok(receipt.clone());
        }

        let spin_kind = self.spins.lock().await.peek(user, &self.spin_config, now);
        let was_free = spin_kind == SpinKind::Free;
        let cost = if was_free {
            0
        } else {
            self.spin_config.premium_spin_cost
        };

        let balance_before = self.ledger.balance(user).await;

        // A premium spin is validated and debited exactly like a bet
        let mut debit: Option<LedgerEntry> = None;
        if cost > 0 {
            if balance_before < cost {
                return Err(CoreError::InsufficientBalance {
                    required: cost,
                    available: balance_before,
                });
            }
            debit = Some(
                self.ledger
                    .append(NewEntry {
                        kind: TransactionKind::WagerDebit,
                        currency: Currency::Kc,
                        amount: cost,
                        sender: AccountRef::User(user),
                        recipient: Some(AccountRef::House),
                        related: Some(RelatedRef::Game(game_id)),
                        operation: Some(operation),
                    })
                    .await?,
            );
        }

        let outcome = {
            let mut rng = self.rng.lock().await;
            games::daily_spin::resolve(&rewards, rng.as_mut())
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => {
                if let Some(debit) = &debit {
                    self.compensate(user, debit, "spin resolution failed").await?;
                }
                return Err(error);
            }
        };
        let reward = match &outcome.detail {
            OutcomeDetail::DailySpin { reward } => reward.clone(),
            other => {
                return Err(CoreError::validation(format!(
                    "spin resolver produced mismatched detail {:?}",
                    other
                )))
            }
        };

        // Credit the reward; free spins carry the operation key here since
        // they produce no debit entry
        if reward.kc_amount > 0 {
            let credit_operation = if debit.is_none() { Some(operation) } else { None };
            if let Err(error) = self
                .ledger
                .append(NewEntry {
                    kind: TransactionKind::Reward,
                    currency: Currency::Kc,
                    amount: reward.kc_amount,
                    sender: AccountRef::House,
                    recipient: Some(AccountRef::User(user)),
                    related: Some(RelatedRef::Game(game_id)),
                    operation: credit_operation,
                })
                .await
            {
                if let Some(debit) = &debit {
                    self.compensate(user, debit, "spin reward credit failed")
                        .await?;
                }
                return Err(error);
            }
        }

        let balance_after = self.ledger.balance(user).await;
        let receipt = self
            .settle(
                user,
                game_id,
                cost,
                reward.kc_amount,
                balance_before,
                balance_after,
                &outcome,
            )
            .await;

        self.spins.lock().await.commit(user, &self.spin_config, now);
        self.metrics.record_spin(was_free);
        info!(
            user_id = %user,
            game_id = %game_id,
            reward = %reward.code,
            was_free,
            balance_after,
            "Daily spin settled"
        );

        let receipt = SpinReceipt {
            play_id: receipt.play_id,
            reward,
            was_free,
            balance_after,
        };
        self.completed_spins
            .write()
            .await
            .insert(operation, receipt.clone());
        drop(guard);

        Ok(receipt)
    }

    /// Daily-spin quota status using the current wall clock
    pub async fn daily_spin_status(&self, user: Uuid) -> SpinStatus {
        self.daily_spin_status_at(user, Utc::now()).await
    }

    /// Daily-spin quota status at an explicit instant
    pub async fn daily_spin_status_at(&self, user: Uuid, now: DateTime<Utc>) -> SpinStatus {
        self.spins.lock().await.status(user, &self.spin_config, now)
    }

    /// Validate a play request against the catalog, returning the rules
    async fn validated_game(&self, request: &PlayRequest) -> CoreResult<(Uuid, VariantRules)> {
        let catalog = self.catalog.read().await;
        let game = catalog.get(&request.game_id).ok_or(CoreError::NotFound {
            entity: "game",
            id: request.game_id.to_string(),
        })?;

        if game.variant() == GameVariant::DailySpin {
            return Err(CoreError::validation_field(
                "daily spin is played through the spin endpoint",
                "game_id",
            ));
        }
        if game.status != GameStatus::Active {
            return Err(CoreError::GameUnavailable {
                game_id: game.id,
                reason: format!("status {:?}", game.status),
            });
        }

        game.validate_bet(request.bet)?;
        games::validate_choice(&game.rules, &request.choice)?;

        Ok((game.id, game.rules.clone()))
    }

    /// Write the play record and fold the play into game totals
    #[allow(clippy::too_many_arguments)]
    async fn settle(
        &self,
        user: Uuid,
        game_id: Uuid,
        bet: u64,
        paid_out: u64,
        balance_before: u64,
        balance_after: u64,
        outcome: &Outcome,
    ) -> PlayReceipt {
        let play_id = Uuid::new_v4();
        let variant = match &outcome.detail {
            OutcomeDetail::NumberGuess { .. } => GameVariant::NumberGuess,
            OutcomeDetail::TripleDraw { .. } => GameVariant::TripleDraw,
            OutcomeDetail::CoinFlip { .. } => GameVariant::CoinFlip,
            OutcomeDetail::DailySpin { .. } => GameVariant::DailySpin,
        };
        let kc_delta = paid_out as i64 - bet as i64;

        self.history
            .append(PlayRecord {
                id: play_id,
                player: user,
                game_id,
                variant,
                bet,
                result: outcome.result,
                kc_delta,
                balance_before,
                balance_after,
                detail: outcome.detail.clone(),
                created_at: Utc::now(),
            })
            .await;

        // Running totals are best-effort aggregates; a missing game (for
        // example one removed mid-flight) must not fail a settled play
        let mut catalog = self.catalog.write().await;
        if catalog
            .record_play(&game_id, bet, paid_out, outcome.result)
            .is_err()
        {
            warn!(game_id = %game_id, "Settled play against a game missing from the catalog");
        }

        PlayReceipt {
            play_id,
            game_id,
            result: outcome.result,
            kc_delta,
            balance_after,
            detail: outcome.detail.clone(),
        }
    }

    /// Reverse a debit after a mid-sequence failure
    ///
    /// Retries the refund a bounded number of times; exhaustion flags the
    /// play for manual reconciliation and escalates as fatal.
    async fn compensate(&self, user: Uuid, debit: &LedgerEntry, reason: &str) -> CoreResult<()> {
        let attempts = self.wager_config.compensation_retries.max(1);
        for attempt in 1..=attempts {
            match self
                .ledger
                .append(NewEntry {
                    kind: TransactionKind::Refund,
                    currency: Currency::Kc,
                    amount: debit.amount,
                    sender: AccountRef::House,
                    recipient: Some(AccountRef::User(user)),
                    related: Some(RelatedRef::Entry(debit.id)),
                    operation: None,
                })
                .await
            {
                Ok(refund) => {
                    self.metrics.record_compensation();
                    warn!(
                        user_id = %user,
                        debit_entry = %debit.id,
                        refund_entry = %refund.id,
                        reason,
                        "Debit compensated with refund"
                    );
                    return Ok(());
                }
                Err(error) => {
                    warn!(
                        user_id = %user,
                        debit_entry = %debit.id,
                        attempt,
                        error = %error,
                        "Compensating refund attempt failed"
                    );
                }
            }
        }

        self.metrics.record_reconciliation();
        self.health.flag_reconciliation(ReconciliationFlag {
            user_id: user,
            debit_entry: debit.id,
            reason: reason.to_string(),
            flagged_at: Utc::now(),
        });
        Err(CoreError::Reconciliation {
            message: format!(
                "refund for debit {} failed after {} attempts ({})",
                debit.id, attempts, reason
            ),
            debit_entry: Some(debit.id),
        })
    }
}
