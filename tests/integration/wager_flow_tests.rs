//! End-to-end play flows through the client facade

use chrono::Utc;
use uuid::Uuid;

use croupier::{
    Caller, GameVariant, PageRequest, Period, PlayRequest, PlayResult, PlayerChoice,
    TransactionKind,
};

use crate::mocks::{
    coin_flip_request, fund, funded_player, game_id_by_slug, scripted_client, seeded_client,
};

#[tokio::test]
async fn test_win_then_lose_flow_keeps_every_record_consistent() {
    // First flip lands heads (win), second tails (lose)
    let client = scripted_client(vec![0, 1]);
    let caller = funded_player(&client, 1_000).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    let win = client
        .play_game(caller, coin_flip_request(game, 100))
        .await
        .unwrap();
    assert_eq!(win.result, PlayResult::Win);
    assert_eq!(win.kc_delta, 95);
    assert_eq!(win.balance_after, 1_095);

    let lose = client
        .play_game(caller, coin_flip_request(game, 200))
        .await
        .unwrap();
    assert_eq!(lose.result, PlayResult::Lose);
    assert_eq!(lose.kc_delta, -200);
    assert_eq!(lose.balance_after, 895);

    assert_eq!(client.balance(caller).await, 895);

    // History mirrors the ledger's view at each step
    let history = client
        .play_history(caller, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total, 2);
    assert_eq!(history.items[0].balance_before, 1_095);
    assert_eq!(history.items[0].balance_after, 895);
    assert_eq!(history.items[1].balance_before, 1_000);
    assert_eq!(history.items[1].balance_after, 1_095);

    // The ledger shows two debits and one credit
    let entries = client
        .ledger_entries(caller, &Default::default(), PageRequest { page: 1, limit: 50 })
        .await
        .unwrap();
    let debits = entries
        .items
        .iter()
        .filter(|e| e.kind == TransactionKind::WagerDebit)
        .count();
    let credits = entries
        .items
        .iter()
        .filter(|e| e.kind == TransactionKind::WagerCredit)
        .count();
    assert_eq!(debits, 2);
    assert_eq!(credits, 1);

    // Stats and leaderboard see the same world
    let stats = client.game_statistics().await;
    assert_eq!(stats.overall.plays, 2);
    assert_eq!(stats.overall.winners, 1);
    assert_eq!(stats.overall.losers, 1);

    let board = client.leaderboard(Period::AllTime, None).await;
    assert_eq!(board[0].player, caller.user_id);
    assert_eq!(board[0].net_winnings, -105);
}

#[tokio::test]
async fn test_number_guess_play_records_variant_detail() {
    // Guess 7, scripted roll 7: a win at 9.0x
    let client = scripted_client(vec![7]);
    let caller = funded_player(&client, 500).await;
    let game = game_id_by_slug(&client, "number-guess").await;

    let receipt = client
        .play_game(
            caller,
            PlayRequest {
                game_id: game,
                bet: 50,
                choice: PlayerChoice::Number { value: 7 },
                operation_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();

    assert_eq!(receipt.result, PlayResult::Win);
    assert_eq!(receipt.kc_delta, 50 * 9 - 50);

    let history = client
        .play_history(caller, Some(GameVariant::NumberGuess), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);
}

#[tokio::test]
async fn test_daily_spin_full_day_cycle() {
    let client = seeded_client(42);
    let caller = funded_player(&client, 10_000).await;

    let now = Utc::now();
    let status = client.daily_spin_status(caller).await;
    assert_eq!(status.remaining_free_spins, 3);
    assert!(status.last_spin_at.is_none());

    let mut free_spins = 0;
    for _ in 0..3 {
        let receipt = client
            .orchestrator()
            .play_daily_spin_at(caller.user_id, Uuid::new_v4(), now)
            .await
            .unwrap();
        if receipt.was_free {
            free_spins += 1;
        }
    }
    assert_eq!(free_spins, 3);

    // Fourth spin costs the premium
    let balance_before = client.balance(caller).await;
    let premium = client
        .orchestrator()
        .play_daily_spin_at(caller.user_id, Uuid::new_v4(), now)
        .await
        .unwrap();
    assert!(!premium.was_free);
    assert_eq!(
        premium.balance_after,
        balance_before - 100 + premium.reward.kc_amount
    );

    // Next local day the quota is back
    let tomorrow = now + chrono::Duration::days(1);
    let receipt = client
        .orchestrator()
        .play_daily_spin_at(caller.user_id, Uuid::new_v4(), tomorrow)
        .await
        .unwrap();
    assert!(receipt.was_free);

    // Spins land in play history as daily-spin records
    let spins = client
        .play_history(caller, Some(GameVariant::DailySpin), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(spins.total, 5);
}

#[tokio::test]
async fn test_gift_flow_reuses_ledger_contract() {
    let client = seeded_client(7);
    let alice = funded_player(&client, 1_000).await;
    let bob = Caller::player(Uuid::new_v4());

    let gift_id = Uuid::new_v4();
    let entry = client
        .record_gift(alice, bob.user_id, 250, gift_id)
        .await
        .unwrap();

    assert_eq!(entry.kind, TransactionKind::Gift);
    assert_eq!(client.balance(alice).await, 750);
    assert_eq!(client.balance(bob).await, 250);

    // An over-balance gift is rejected without moving anything
    let err = client
        .record_gift(bob, alice.user_id, 9_999, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");
    assert_eq!(client.balance(bob).await, 250);
}

#[tokio::test]
async fn test_balance_is_never_intermediate_after_errors() {
    let client = seeded_client(9);
    let caller = funded_player(&client, 120).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    // Every failed attempt leaves the pre-play balance intact
    for bet in [0u64, 5, 121, 50_000] {
        let result = client.play_game(caller, coin_flip_request(game, bet)).await;
        assert!(result.is_err());
        assert_eq!(client.balance(caller).await, 120);
    }

    fund(&client, caller.user_id, 1_000).await;
    let receipt = client
        .play_game(caller, coin_flip_request(game, 100))
        .await
        .unwrap();
    assert_eq!(client.balance(caller).await, receipt.balance_after);
}
