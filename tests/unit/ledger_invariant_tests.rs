//! Ledger correctness invariants
//!
//! For all users, at all times, the reported balance equals credits minus
//! debits over completed entries, and never goes negative.

use uuid::Uuid;

use croupier::{
    AccountRef, Currency, LedgerEntry, LedgerStore, NewEntry, TransactionKind, TransactionStatus,
};

/// Independent oracle: recompute a balance from raw entries
fn derived_balance(entries: &[LedgerEntry], user: Uuid) -> i128 {
    let account = AccountRef::User(user);
    let mut total: i128 = 0;
    for entry in entries {
        if entry.status != TransactionStatus::Completed {
            continue;
        }
        if entry.recipient == Some(account) {
            total += entry.amount as i128;
        }
        if entry.sender == account {
            total -= entry.amount as i128;
        }
    }
    total
}

fn credit(user: Uuid, kind: TransactionKind, amount: u64) -> NewEntry {
    NewEntry {
        kind,
        currency: Currency::Kc,
        amount,
        sender: AccountRef::House,
        recipient: Some(AccountRef::User(user)),
        related: None,
        operation: None,
    }
}

fn debit(user: Uuid, amount: u64) -> NewEntry {
    NewEntry {
        kind: TransactionKind::WagerDebit,
        currency: Currency::Kc,
        amount,
        sender: AccountRef::User(user),
        recipient: Some(AccountRef::House),
        related: None,
        operation: None,
    }
}

#[tokio::test]
async fn test_balance_matches_oracle_over_mixed_operations() {
    let store = LedgerStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Seed both users through pending deposits
    for user in [alice, bob] {
        let entry = store
            .append(credit(user, TransactionKind::Deposit, 2_000))
            .await
            .unwrap();
        store.complete_entry(entry.id).await.unwrap();
    }

    // A mix of wagers, rewards, refunds, and a gift
    store.append(debit(alice, 300)).await.unwrap();
    store
        .append(credit(alice, TransactionKind::WagerCredit, 585))
        .await
        .unwrap();
    store.append(debit(alice, 500)).await.unwrap();
    store
        .append(credit(alice, TransactionKind::Refund, 500))
        .await
        .unwrap();
    store
        .append(credit(bob, TransactionKind::Reward, 25))
        .await
        .unwrap();
    store
        .record_gift(bob, alice, 150, Uuid::new_v4())
        .await
        .unwrap();

    // A pending deposit that must not count
    store
        .append(credit(alice, TransactionKind::Deposit, 9_999))
        .await
        .unwrap();

    let entries = store.entries_snapshot().await;
    for user in [alice, bob] {
        let oracle = derived_balance(&entries, user);
        assert!(oracle >= 0, "balance must never be negative");
        assert_eq!(store.balance(user).await as i128, oracle);
    }

    assert_eq!(store.balance(alice).await, 2_000 - 300 + 585 - 500 + 500 + 150);
    assert_eq!(store.balance(bob).await, 2_000 + 25 - 150);
}

#[tokio::test]
async fn test_completed_entries_are_immutable() {
    let store = LedgerStore::new();
    let user = Uuid::new_v4();

    let entry = store
        .append(credit(user, TransactionKind::Deposit, 100))
        .await
        .unwrap();
    let completed = store.complete_entry(entry.id).await.unwrap();

    // No restatement path exists for a completed entry
    assert!(store.complete_entry(entry.id).await.is_err());
    assert!(store
        .resolve_pending(entry.id, TransactionStatus::Cancelled)
        .await
        .is_err());

    // The stored entry still carries its original amount and status
    let stored = store.get(entry.id).await.unwrap();
    assert_eq!(stored.amount, completed.amount);
    assert_eq!(stored.status, TransactionStatus::Completed);
}

#[tokio::test]
async fn test_transaction_codes_are_distinct_across_entries() {
    let store = LedgerStore::new();
    let user = Uuid::new_v4();

    let mut codes = std::collections::HashSet::new();
    for _ in 0..100 {
        let entry = store
            .append(credit(user, TransactionKind::Reward, 10))
            .await
            .unwrap();
        assert!(codes.insert(entry.code.clone()), "code reuse: {}", entry.code);
    }
}
