//! In-memory reference implementation of the ledger consistency contract
//!
//! The store guarantees:
//! - balances are derived from completed entries, never counted separately
//! - completed entries are immutable; corrections are new `Refund` entries
//! - a duplicated wager operation key is rejected, never silently absorbed
//! - reads reflect every append committed before the call returned
//!
//! A persistent engine can replace this as long as it upholds the same
//! contract.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

use super::entry::{
    transaction_code, AccountRef, LedgerEntry, NewEntry, OperationKey, RelatedRef,
    TransactionKind, TransactionStatus,
};
use super::Currency;

/// Filter for ledger listings
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    /// Entries where the account is sender or recipient
    pub account: Option<AccountRef>,
    pub kind: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Pagination request; pages are 1-based
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

/// One page of a listing, with the total count across all pages
#[derive(Debug, Clone, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<LedgerEntry>,
    by_id: HashMap<Uuid, usize>,
    operations: HashSet<OperationKey>,
}

impl Inner {
    /// Derived balance: credits minus debits over completed entries
    fn balance(&self, user: Uuid) -> u64 {
        let account = AccountRef::User(user);
        let mut credits: u128 = 0;
        let mut debits: u128 = 0;
        for entry in &self.entries {
            if !entry.is_completed() {
                continue;
            }
            if entry.recipient == Some(account) {
                credits += entry.amount as u128;
            }
            if entry.sender == account {
                debits += entry.amount as u128;
            }
        }
        credits.saturating_sub(debits) as u64
    }
}

/// Test-only failure injection: skip N appends, then fail the next K
#[cfg(test)]
#[derive(Debug, Default)]
struct FailPoint {
    skip: std::sync::atomic::AtomicU32,
    fail: std::sync::atomic::AtomicU32,
}

/// Append-only ledger store
#[derive(Debug, Default)]
pub struct LedgerStore {
    inner: RwLock<Inner>,
    #[cfg(test)]
    failpoint: FailPoint,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for a user
    ///
    /// Reflects every entry whose append completed before this call.
    pub async fn balance(&self, user: Uuid) -> u64 {
        self.inner.read().await.balance(user)
    }

    /// Append a movement to the ledger
    ///
    /// Wager-originated kinds complete synchronously and update the derived
    /// balance immediately; deposits and withdrawals start out pending.
    pub async fn append(&self, new: NewEntry) -> CoreResult<LedgerEntry> {
        #[cfg(test)]
        {
            use std::sync::atomic::Ordering;
            if self.failpoint.skip.load(Ordering::SeqCst) > 0 {
                self.failpoint.skip.fetch_sub(1, Ordering::SeqCst);
            } else if self.failpoint.fail.load(Ordering::SeqCst) > 0 {
                self.failpoint.fail.fetch_sub(1, Ordering::SeqCst);
                return Err(CoreError::Persistence {
                    message: "injected append failure".to_string(),
                    operation: "append".to_string(),
                });
            }
        }

        if new.amount == 0 {
            return Err(CoreError::validation_field(
                "ledger amounts must be positive",
                "amount",
            ));
        }
        if new.recipient == Some(new.sender) {
            return Err(CoreError::validation_field(
                "sender and recipient must differ",
                "recipient",
            ));
        }

        let mut inner = self.inner.write().await;

        if let Some(operation) = new.operation {
            if inner.operations.contains(&operation) {
                warn!(
                    user_id = %operation.user_id,
                    operation_id = %operation.operation_id,
                    "Rejected duplicate ledger operation"
                );
                return Err(CoreError::DuplicateOperation {
                    user_id: operation.user_id,
                    operation_id: operation.operation_id,
                });
            }
        }

        let completes = new.kind.completes_synchronously();

        let sender_balance_before = new.sender.user_id().map(|u| inner.balance(u));
        let recipient_balance_before = new
            .recipient
            .and_then(|r| r.user_id())
            .map(|u| inner.balance(u));

        // A synchronously-completing debit may never push a user negative
        if completes {
            if let Some(before) = sender_balance_before {
                if before < new.amount {
                    return Err(CoreError::InsufficientBalance {
                        required: new.amount,
                        available: before,
                    });
                }
            }
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let (status, completed_at) = if completes {
            (TransactionStatus::Completed, Some(now))
        } else {
            (TransactionStatus::Pending, None)
        };

        let entry = LedgerEntry {
            id,
            code: transaction_code(&id),
            kind: new.kind,
            currency: new.currency,
            amount: new.amount,
            sender: new.sender,
            recipient: new.recipient,
            status,
            sender_balance_before,
            sender_balance_after: if completes {
                sender_balance_before.map(|b| b - new.amount)
            } else {
                None
            },
            recipient_balance_before,
            recipient_balance_after: if completes {
                recipient_balance_before.map(|b| b + new.amount)
            } else {
                None
            },
            related: new.related,
            operation: new.operation,
            created_at: now,
            completed_at,
        };

        if let Some(operation) = new.operation {
            inner.operations.insert(operation);
        }
        let index = inner.entries.len();
        inner.entries.push(entry.clone());
        inner.by_id.insert(id, index);

        debug!(
            entry_id = %id,
            kind = ?entry.kind,
            amount = entry.amount,
            status = ?entry.status,
            "Appended ledger entry"
        );

        Ok(entry)
    }

    /// Complete a pending entry, settling it into balances
    pub async fn complete_entry(&self, id: Uuid) -> CoreResult<LedgerEntry> {
        let mut inner = self.inner.write().await;

        let index = *inner.by_id.get(&id).ok_or(CoreError::NotFound {
            entity: "ledger entry",
            id: id.to_string(),
        })?;

        if inner.entries[index].status != TransactionStatus::Pending {
            return Err(CoreError::validation_field(
                "only pending entries can be completed",
                "status",
            ));
        }

        let amount = inner.entries[index].amount;
        let sender = inner.entries[index].sender;
        let sender_before = sender.user_id().map(|u| inner.balance(u));
        if let Some(before) = sender_before {
            if before < amount {
                return Err(CoreError::InsufficientBalance {
                    required: amount,
                    available: before,
                });
            }
        }
        let recipient_before = inner.entries[index]
            .recipient
            .and_then(|r| r.user_id())
            .map(|u| inner.balance(u));

        let entry = &mut inner.entries[index];
        entry.status = TransactionStatus::Completed;
        entry.completed_at = Some(Utc::now());
        entry.sender_balance_before = sender_before;
        entry.sender_balance_after = sender_before.map(|b| b - amount);
        entry.recipient_balance_before = recipient_before;
        entry.recipient_balance_after = recipient_before.map(|b| b + amount);
        let entry = entry.clone();

        info!(entry_id = %id, kind = ?entry.kind, amount, "Completed pending ledger entry");

        Ok(entry)
    }

    /// Terminally resolve a pending entry without settling it
    ///
    /// `status` must be `Failed`, `Cancelled`, or `Refunded`. Completed
    /// entries are immutable and cannot be restated through this path.
    pub async fn resolve_pending(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> CoreResult<LedgerEntry> {
        if !matches!(
            status,
            TransactionStatus::Failed | TransactionStatus::Cancelled | TransactionStatus::Refunded
        ) {
            return Err(CoreError::validation_field(
                "pending entries resolve to failed, cancelled, or refunded",
                "status",
            ));
        }

        let mut inner = self.inner.write().await;

        let index = *inner.by_id.get(&id).ok_or(CoreError::NotFound {
            entity: "ledger entry",
            id: id.to_string(),
        })?;

        if inner.entries[index].status != TransactionStatus::Pending {
            return Err(CoreError::validation_field(
                "only pending entries can be resolved",
                "status",
            ));
        }

        let entry = &mut inner.entries[index];
        entry.status = status;
        let entry = entry.clone();

        info!(entry_id = %id, status = ?status, "Resolved pending ledger entry");

        Ok(entry)
    }

    /// Record a gift transfer between two users
    ///
    /// Gift flows from the social subsystem reuse the ledger contract
    /// rather than keeping their own accounting.
    pub async fn record_gift(
        &self,
        sender: Uuid,
        recipient: Uuid,
        amount: u64,
        gift_id: Uuid,
    ) -> CoreResult<LedgerEntry> {
        self.append(NewEntry {
            kind: TransactionKind::Gift,
            currency: Currency::Kc,
            amount,
            sender: AccountRef::User(sender),
            recipient: Some(AccountRef::User(recipient)),
            related: Some(RelatedRef::Gift(gift_id)),
            operation: None,
        })
        .await
    }

    /// Fetch a single entry
    pub async fn get(&self, id: Uuid) -> Option<LedgerEntry> {
        let inner = self.inner.read().await;
        inner.by_id.get(&id).map(|&index| inner.entries[index].clone())
    }

    /// List entries matching the filter, newest first
    pub async fn list(
        &self,
        filter: &LedgerFilter,
        page: PageRequest,
    ) -> CoreResult<Page<LedgerEntry>> {
        if page.limit == 0 || page.page == 0 {
            return Err(CoreError::validation_field(
                "page and limit must be positive",
                "page",
            ));
        }

        let inner = self.inner.read().await;

        let mut matched: Vec<&LedgerEntry> = inner
            .entries
            .iter()
            .filter(|e| {
                if let Some(account) = filter.account {
                    if e.sender != account && e.recipient != Some(account) {
                        return false;
                    }
                }
                if let Some(kind) = filter.kind {
                    if e.kind != kind {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if e.status != status {
                        return false;
                    }
                }
                if let Some(from) = filter.from {
                    if e.created_at < from {
                        return false;
                    }
                }
                if let Some(to) = filter.to {
                    if e.created_at >= to {
                        return false;
                    }
                }
                true
            })
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

    /// Clone of every entry, for read-only aggregation
    pub async fn entries_snapshot(&self) -> Vec<LedgerEntry> {
        self.inner.read().await.entries.clone()
    }

    /// Arrange for appends to fail, exercising compensation paths
    ///
    /// The next `skip` appends succeed, then the following `count` fail.
    #[cfg(test)]
    pub(crate) fn inject_append_failures(&self, skip: u32, count: u32) {
        use std::sync::atomic::Ordering;
        self.failpoint.skip.store(skip, Ordering::SeqCst);
        self.failpoint.fail.store(count, Ordering::SeqCst);
    }
}
