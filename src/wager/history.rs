//! Play history records
//!
//! One append-only record per resolved play, independent of the ledger
//! entries it produced. Records reference games and players by id only;
//! joins happen at query time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::games::{GameVariant, OutcomeDetail, PlayResult};
use crate::ledger::{Page, PageRequest};

/// Historical record of one resolved play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub id: Uuid,
    pub player: Uuid,
    pub game_id: Uuid,
    pub variant: GameVariant,
    /// Amount debited for this play (zero for a free spin)
    pub bet: u64,
    pub result: PlayResult,
    /// Net KC movement for the player: credits minus debits
    pub kc_delta: i64,
    pub balance_before: u64,
    pub balance_after: u64,
    pub detail: OutcomeDetail,
    pub created_at: DateTime<Utc>,
}

/// Append-only store of play records
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: RwLock<Vec<PlayRecord>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record; records are never updated or deleted
    pub async fn append(&self, record: PlayRecord) {
        self.records.write().await.push(record);
    }

    /// A user's play history, newest first, optionally filtered by variant
    pub async fn list_for_player(
        &self,
        player: Uuid,
        variant: Option<GameVariant>,
        page: PageRequest,
    ) -> CoreResult<Page<PlayRecord>> {
        if page.limit == 0 || page.page == 0 {
            return Err(CoreError::validation_field(
                "page and limit must be positive",
                "page",
            ));
        }

        let records = self.records.read().await;

        let mut matched: Vec<&PlayRecord> = records
            .iter()
            .filter(|r| r.player == player && variant.map_or(true, |v| r.variant == v))
            .collect();
        matched.reverse();

        let total = matched.len() as u64;
        let start = (page.page as usize - 1) * page.limit as usize;
        let items = matched
            .into_iter()
            .skip(start)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Clone of every record, for read-only aggregation
    pub async fn snapshot(&self) -> Vec<PlayRecord> {
        self.records.read().await.clone()
    }
}
