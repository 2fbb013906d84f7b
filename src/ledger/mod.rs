//! Append-only KC ledger: the single source of truth for balances
//!
//! A user's balance is always derived from completed entries — there is no
//! separately-mutated wallet counter anywhere in the core. Everything that
//! moves currency (wagers, gifts, rewards, deposits, refunds) goes through
//! [`store::LedgerStore::append`].

pub mod entry;
pub mod store;

pub use entry::{
    AccountRef, Currency, LedgerEntry, NewEntry, OperationKey, RelatedRef, TransactionKind,
    TransactionStatus,
};
pub use store::{LedgerFilter, LedgerStore, Page, PageRequest};
