//! Ledger entry model
//!
//! One entry per currency movement. Entries are append-only: once an entry
//! reaches `Completed` it is never mutated again, and corrections are new
//! `Refund` entries referencing the original.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::utils;

/// Kind of currency movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
    WagerDebit,
    WagerCredit,
    Gift,
    Reward,
    Refund,
}

impl TransactionKind {
    /// Whether entries of this kind settle synchronously on append
    ///
    /// Deposits and withdrawals wait on an external money flow and start
    /// out pending; everything the core itself originates completes
    /// immediately.
    pub fn completes_synchronously(&self) -> bool {
        !matches!(self, TransactionKind::Deposit | TransactionKind::Withdraw)
    }
}

/// Currency of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Platform virtual currency
    Kc,
    /// Real-money unit (smallest denomination)
    Cash,
}

/// Settlement status of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
    Refunded,
}

/// One side of a movement: a user account or the house
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRef {
    User(Uuid),
    House,
}

impl AccountRef {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AccountRef::User(id) => Some(*id),
            AccountRef::House => None,
        }
    }
}

/// Reference linking an entry to the entity that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RelatedRef {
    Game(Uuid),
    Gift(Uuid),
    /// For refunds: the entry being reversed
    Entry(Uuid),
}

/// Idempotency key for a client-originated operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationKey {
    pub user_id: Uuid,
    pub operation_id: Uuid,
}

/// Request to append a new movement to the ledger
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: u64,
    pub sender: AccountRef,
    pub recipient: Option<AccountRef>,
    pub related: Option<RelatedRef>,
    /// Present on the debit of a wager sequence; duplicates are rejected
    pub operation: Option<OperationKey>,
}

/// One immutable record of a currency movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    /// Externally unguessable transaction code
    pub code: String,
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: u64,
    pub sender: AccountRef,
    pub recipient: Option<AccountRef>,
    pub status: TransactionStatus,
    /// Sender balance around the movement; `None` for the house side
    pub sender_balance_before: Option<u64>,
    pub sender_balance_after: Option<u64>,
    /// Recipient balance around the movement; `None` for the house side
    pub recipient_balance_before: Option<u64>,
    pub recipient_balance_after: Option<u64>,
    pub related: Option<RelatedRef>,
    pub operation: Option<OperationKey>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

/// Generate an externally unguessable transaction code
///
/// A fresh UUID is hashed together with the entry id so the code cannot be
/// predicted from visible identifiers.
pub fn transaction_code(entry_id: &Uuid) -> String {
    let nonce = Uuid::new_v4();
    let material = format!("{}:{}", entry_id, nonce);
    let digest = utils::sha256_hex(material.as_bytes());
    format!("TX-{}", &digest[..20].to_uppercase())
}
