//! Shared fixtures for the croupier test suite

use uuid::Uuid;

use croupier::{
    AccountRef, Caller, CoreClient, CoreConfig, Currency, GameCatalog, NewEntry, PlayRequest,
    PlayerChoice, ScriptedSource, SeededSource, TransactionKind,
};

/// Client whose draws replay the given integer script
pub fn scripted_client(ints: Vec<i64>) -> CoreClient {
    CoreClient::with_parts(
        &CoreConfig::default(),
        GameCatalog::with_defaults(),
        Box::new(ScriptedSource::with_ints(ints)),
    )
}

/// Client whose unit draws replay the given script
pub fn unit_scripted_client(units: Vec<f64>) -> CoreClient {
    CoreClient::with_parts(
        &CoreConfig::default(),
        GameCatalog::with_defaults(),
        Box::new(ScriptedSource::with_units(units)),
    )
}

/// Client with a deterministic seeded source
pub fn seeded_client(seed: u64) -> CoreClient {
    CoreClient::with_parts(
        &CoreConfig::default(),
        GameCatalog::with_defaults(),
        Box::new(SeededSource::new(seed)),
    )
}

/// Deposit and settle KC for a user
pub async fn fund(client: &CoreClient, user: Uuid, amount: u64) {
    let entry = client
        .ledger()
        .append(NewEntry {
            kind: TransactionKind::Deposit,
            currency: Currency::Kc,
            amount,
            sender: AccountRef::House,
            recipient: Some(AccountRef::User(user)),
            related: None,
            operation: None,
        })
        .await
        .expect("test deposit should append");
    client
        .ledger()
        .complete_entry(entry.id)
        .await
        .expect("test deposit should complete");
}

/// Look up a seeded game's id by slug
pub async fn game_id_by_slug(client: &CoreClient, slug: &str) -> Uuid {
    client
        .games()
        .await
        .into_iter()
        .find(|g| g.slug == slug)
        .unwrap_or_else(|| panic!("game {} missing from catalog", slug))
        .id
}

/// A coin-flip play request on heads with a fresh operation id
pub fn coin_flip_request(game_id: Uuid, bet: u64) -> PlayRequest {
    PlayRequest {
        game_id,
        bet,
        choice: PlayerChoice::Side {
            value: "heads".to_string(),
        },
        operation_id: Uuid::new_v4(),
    }
}

/// A funded player caller
pub async fn funded_player(client: &CoreClient, amount: u64) -> Caller {
    let caller = Caller::player(Uuid::new_v4());
    fund(client, caller.user_id, amount).await;
    caller
}
