//! Idempotency: replayed operations never double-debit

use std::sync::Arc;

use uuid::Uuid;

use croupier::{AccountRef, Currency, NewEntry, OperationKey, PageRequest, TransactionKind};

use crate::mocks::{
    coin_flip_request, funded_player, game_id_by_slug, scripted_client, unit_scripted_client,
};

#[tokio::test]
async fn test_replay_returns_original_receipt_without_second_debit() {
    // Only one scripted draw: a replay that resolved again would draw the
    // range floor and change the result
    let client = scripted_client(vec![0]);
    let caller = funded_player(&client, 1_000).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    let request = coin_flip_request(game, 100);
    let first = client.play_game(caller, request.clone()).await.unwrap();

    for _ in 0..5 {
        let replay = client.play_game(caller, request.clone()).await.unwrap();
        assert_eq!(replay, first);
    }

    assert_eq!(client.balance(caller).await, 1_095);
    let history = client
        .play_history(caller, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);
}

#[tokio::test]
async fn test_concurrent_replays_of_one_operation_settle_once() {
    let client = Arc::new(scripted_client(vec![0]));
    let caller = funded_player(&client, 1_000).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    let request = coin_flip_request(game, 100);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = Arc::clone(&client);
        let request = request.clone();
        handles.push(tokio::spawn(async move {
            client.play_game(caller, request).await
        }));
    }

    let mut receipts = Vec::new();
    for handle in handles {
        receipts.push(handle.await.unwrap().expect("replays must succeed"));
    }

    let first = &receipts[0];
    for receipt in &receipts {
        assert_eq!(receipt, first);
    }

    // Exactly one debit despite ten racing calls
    assert_eq!(client.balance(caller).await, 1_095);
    let entries = client
        .ledger_entries(caller, &Default::default(), PageRequest { page: 1, limit: 50 })
        .await
        .unwrap();
    let debits = entries
        .items
        .iter()
        .filter(|e| e.kind == TransactionKind::WagerDebit)
        .count();
    assert_eq!(debits, 1);
}

#[tokio::test]
async fn test_store_level_backstop_rejects_reused_operation_keys() {
    let client = scripted_client(vec![0]);
    let caller = funded_player(&client, 1_000).await;

    let operation = OperationKey {
        user_id: caller.user_id,
        operation_id: Uuid::new_v4(),
    };
    let debit = NewEntry {
        kind: TransactionKind::WagerDebit,
        currency: Currency::Kc,
        amount: 100,
        sender: AccountRef::User(caller.user_id),
        recipient: Some(AccountRef::House),
        related: None,
        operation: Some(operation),
    };

    client.ledger().append(debit.clone()).await.unwrap();
    let err = client.ledger().append(debit).await.unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_OPERATION");
    assert_eq!(client.balance(caller).await, 900);
}

#[tokio::test]
async fn test_distinct_operations_are_not_deduplicated() {
    let client = scripted_client(vec![0, 0, 0]);
    let caller = funded_player(&client, 1_000).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    // Same game, same bet, different operation ids: three real plays
    for _ in 0..3 {
        client
            .play_game(caller, coin_flip_request(game, 100))
            .await
            .unwrap();
    }

    let history = client
        .play_history(caller, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total, 3);
}

#[tokio::test]
async fn test_spin_replay_returns_original_reward() {
    // A second resolution would draw 0.2 and land a different reward; the
    // replay must come from the receipt cache instead
    let client = unit_scripted_client(vec![0.99, 0.2]);
    let caller = funded_player(&client, 1_000).await;

    let operation_id = Uuid::new_v4();
    let first = client.play_daily_spin(caller, operation_id).await.unwrap();
    let replay = client.play_daily_spin(caller, operation_id).await.unwrap();

    assert_eq!(first, replay);
    // A replay consumed no extra quota
    let status = client.daily_spin_status(caller).await;
    assert_eq!(status.remaining_free_spins, 2);
}
