//! JSON serialization of the wire-facing data model
//!
//! API layers serialize ledger entries, play records, and game rules; the
//! shapes here are what external consumers see.

use croupier::{
    games, PlayerChoice, RewardDescriptor, ScriptedSource, VariantRules, WeightedReward,
};

use crate::mocks::{coin_flip_request, funded_player, game_id_by_slug, scripted_client};

#[test]
fn test_variant_rules_roundtrip_through_json() {
    let rules = vec![
        VariantRules::NumberGuess {
            min_number: 1,
            max_number: 10,
            multiplier_bps: 90_000,
        },
        VariantRules::TripleDraw {
            three_sevens_bps: 70_000,
            three_of_a_kind_bps: 30_000,
            straight_bps: 20_000,
        },
        VariantRules::CoinFlip {
            sides: ["heads".to_string(), "tails".to_string()],
            multiplier_bps: 19_500,
        },
        VariantRules::DailySpin {
            rewards: vec![WeightedReward {
                reward: RewardDescriptor {
                    code: "kc_10".to_string(),
                    kc_amount: 10,
                },
                weight: 100,
            }],
        },
    ];

    for original in rules {
        let json = serde_json::to_string(&original).unwrap();
        let decoded: VariantRules = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }
}

#[test]
fn test_rules_tag_by_variant_name() {
    let rules = VariantRules::CoinFlip {
        sides: ["heads".to_string(), "tails".to_string()],
        multiplier_bps: 19_500,
    };

    let value = serde_json::to_value(&rules).unwrap();
    assert_eq!(value["variant"], "coin_flip");
    assert_eq!(value["multiplier_bps"], 19_500);
}

#[test]
fn test_player_choice_shapes() {
    let number = serde_json::to_value(PlayerChoice::Number { value: 7 }).unwrap();
    assert_eq!(number["kind"], "number");
    assert_eq!(number["value"], 7);

    let side = serde_json::to_value(PlayerChoice::Side {
        value: "tails".to_string(),
    })
    .unwrap();
    assert_eq!(side["kind"], "side");
}

#[test]
fn test_outcome_detail_serializes_draws() {
    let rules = VariantRules::TripleDraw {
        three_sevens_bps: 70_000,
        three_of_a_kind_bps: 30_000,
        straight_bps: 20_000,
    };
    let mut source = ScriptedSource::with_ints(vec![7, 7, 7]);
    let outcome = games::resolve(&rules, &PlayerChoice::Spin, &mut source).unwrap();

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["result"], "win");
    assert_eq!(value["detail"]["variant"], "triple_draw");
    assert_eq!(value["detail"]["draws"][0], 7);
    assert_eq!(value["detail"]["pattern"], "three_sevens");
}

#[tokio::test]
async fn test_ledger_entry_and_receipt_serialize() {
    let client = scripted_client(vec![0]);
    let caller = funded_player(&client, 1_000).await;
    let game = game_id_by_slug(&client, "coin-flip").await;

    let receipt = client
        .play_game(caller, coin_flip_request(game, 100))
        .await
        .unwrap();
    let receipt_json = serde_json::to_value(&receipt).unwrap();
    assert_eq!(receipt_json["kc_delta"], 95);
    assert_eq!(receipt_json["balance_after"], 1_095);

    let entries = client.ledger().entries_snapshot().await;
    for entry in entries {
        let value = serde_json::to_value(&entry).unwrap();
        // Transaction codes travel with the entry; ids stay stable
        assert_eq!(value["id"], serde_json::json!(entry.id));
        assert!(value["code"].as_str().unwrap().starts_with("TX-"));
    }
}
