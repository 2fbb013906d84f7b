//! Concurrency tests: per-user serializability and cross-user parallelism

use std::sync::Arc;

use uuid::Uuid;

use croupier::{
    AccountRef, Caller, CoreClient, CoreConfig, GameCatalog, SeededSource, TransactionStatus,
};

use crate::mocks::{coin_flip_request, fund, game_id_by_slug};

fn seeded_shared_client(seed: u64) -> Arc<CoreClient> {
    Arc::new(CoreClient::with_parts(
        &CoreConfig::default(),
        GameCatalog::with_defaults(),
        Box::new(SeededSource::new(seed)),
    ))
}

/// Recompute a user's balance from the raw ledger, independent of the store
async fn oracle_balance(client: &CoreClient, user: Uuid) -> i128 {
    let account = AccountRef::User(user);
    let mut total: i128 = 0;
    for entry in client.ledger().entries_snapshot().await {
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

#[tokio::test]
async fn test_no_lost_updates_for_concurrent_same_user_plays() {
    let client = seeded_shared_client(1);
    let caller = Caller::player(Uuid::new_v4());
    let n = 20u64;
    let bet = 100u64;
    let starting = n * bet; // exactly enough for every play

    fund(&client, caller.user_id, starting).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    let mut handles = Vec::new();
    for _ in 0..n {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client
                .play_game(caller, coin_flip_request(game, bet))
                .await
                .expect("funded play should settle")
        }));
    }

    let mut net: i64 = 0;
    for handle in handles {
        let receipt = handle.await.expect("play task should not panic");
        net += receipt.kc_delta;
    }

    // Every play's effect survived: the final balance is the starting
    // balance plus the sum of all applied deltas, and it matches a
    // recomputation from the raw entries.
    let final_balance = client.balance(caller).await;
    assert_eq!(final_balance as i64, starting as i64 + net);
    assert_eq!(final_balance as i128, oracle_balance(&client, caller.user_id).await);

    // All N debits landed; none was overwritten by a racing play
    let history = client
        .play_history(caller, None, croupier::PageRequest { page: 1, limit: 100 })
        .await
        .unwrap();
    assert_eq!(history.total, n);
}

#[tokio::test]
async fn test_concurrent_plays_cannot_double_spend_a_small_balance() {
    let client = seeded_shared_client(2);
    let caller = Caller::player(Uuid::new_v4());

    // Enough for exactly three bets; ten racing plays must not overdraw
    fund(&client, caller.user_id, 300).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client.play_game(caller, coin_flip_request(game, 100)).await
        }));
    }

    let mut settled = 0;
    let mut rejected = 0;
    let mut net: i64 = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(receipt) => {
                settled += 1;
                net += receipt.kc_delta;
            }
            Err(err) => {
                assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");
                rejected += 1;
            }
        }
    }

    // Wins replenish the balance, so at least the three pre-funded plays
    // settled and every rejection was a clean insufficient-balance error.
    assert!(settled >= 3);
    assert_eq!(settled + rejected, 10);

    let final_balance = client.balance(caller).await as i128;
    assert_eq!(final_balance, 300 + net as i128);
    assert_eq!(final_balance, oracle_balance(&client, caller.user_id).await);
}

#[tokio::test]
async fn test_different_users_play_in_parallel() {
    let client = seeded_shared_client(3);
    let game = game_id_by_slug(&client, "coin-flip").await;

    let mut callers = Vec::new();
    for _ in 0..8 {
        let caller = Caller::player(Uuid::new_v4());
        fund(&client, caller.user_id, 1_000).await;
        callers.push(caller);
    }

    let mut handles = Vec::new();
    for caller in &callers {
        let client = Arc::clone(&client);
        let caller = *caller;
        handles.push(tokio::spawn(async move {
            let mut deltas = 0i64;
            for _ in 0..5 {
                let receipt = client
                    .play_game(caller, coin_flip_request(game, 50))
                    .await
                    .expect("funded play should settle");
                deltas += receipt.kc_delta;
            }
            (caller, deltas)
        }));
    }

    for handle in handles {
        let (caller, deltas) = handle.await.unwrap();
        assert_eq!(client.balance(caller).await as i64, 1_000 + deltas);
    }

    let stats = client.game_statistics().await;
    assert_eq!(stats.overall.plays, 8 * 5);
}
