//! Outcome engine tests driven through the public resolve surface

use croupier::{
    games, DrawPattern, OutcomeDetail, PlayResult, PlayerChoice, ScriptedSource, VariantRules,
};

fn lucky7_rules() -> VariantRules {
    VariantRules::TripleDraw {
        three_sevens_bps: 70_000,
        three_of_a_kind_bps: 30_000,
        straight_bps: 20_000,
    }
}

#[test]
fn test_triple_draw_pattern_precedence_sequence() {
    // The canonical precedence fixture: [7,7,7], [3,3,3], [2,3,4], [1,2,4]
    let mut source =
        ScriptedSource::with_ints(vec![7, 7, 7, 3, 3, 3, 2, 3, 4, 1, 2, 4]);
    let rules = lucky7_rules();

    let expectations = [
        (PlayResult::Win, 70_000, Some(DrawPattern::ThreeSevens)),
        (PlayResult::Win, 30_000, Some(DrawPattern::ThreeOfAKind)),
        (PlayResult::Win, 20_000, Some(DrawPattern::Straight)),
        (PlayResult::Lose, 0, None),
    ];

    for (expected_result, expected_bps, expected_pattern) in expectations {
        let outcome = games::resolve(&rules, &PlayerChoice::Spin, &mut source).unwrap();
        assert_eq!(outcome.result, expected_result);
        assert_eq!(outcome.multiplier_bps, expected_bps);
        match outcome.detail {
            OutcomeDetail::TripleDraw { pattern, .. } => assert_eq!(pattern, expected_pattern),
            other => panic!("unexpected detail {:?}", other),
        }
    }
}

#[test]
fn test_coin_flip_house_edge_scenario() {
    // Bet 100 at 1.95x on a matching draw: payout 195, net delta 95
    let rules = VariantRules::CoinFlip {
        sides: ["heads".to_string(), "tails".to_string()],
        multiplier_bps: 19_500,
    };
    let mut source = ScriptedSource::with_ints(vec![0]);

    let outcome = games::resolve(
        &rules,
        &PlayerChoice::Side {
            value: "heads".to_string(),
        },
        &mut source,
    )
    .unwrap();

    assert_eq!(outcome.result, PlayResult::Win);
    let credited = games::payout(100, outcome.multiplier_bps);
    assert_eq!(credited, 195);
    assert_eq!(credited as i64 - 100, 95);
}

#[test]
fn test_number_guess_out_of_range_is_validation_error() {
    let rules = VariantRules::NumberGuess {
        min_number: 1,
        max_number: 10,
        multiplier_bps: 90_000,
    };
    let mut source = ScriptedSource::with_ints(vec![5]);

    for bad in [0, 11, -3] {
        let err = games::resolve(&rules, &PlayerChoice::Number { value: bad }, &mut source)
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    // Boundary values are accepted
    for ok in [1, 10] {
        games::resolve(&rules, &PlayerChoice::Number { value: ok }, &mut source).unwrap();
    }
}
