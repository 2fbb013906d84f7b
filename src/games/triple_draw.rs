//! Triple-draw ("Lucky7") resolver
//!
//! Three independent uniform draws in [1, 7]. Pattern precedence is fixed:
//! three sevens, then any three of a kind, then a sorted consecutive run.
//! Checking in this order is what keeps 7-7-7 classified as three-sevens
//! rather than the lower-paying three-of-a-kind.

use crate::error::{CoreError, CoreResult};

use super::rng::RandomSource;
use super::{DrawPattern, Outcome, OutcomeDetail, PlayResult, VariantRules};

const DRAW_MIN: i64 = 1;
const DRAW_MAX: i64 = 7;

/// Classify three draws against the fixed pattern precedence
fn classify(draws: [u8; 3]) -> Option<DrawPattern> {
    if draws == [7, 7, 7] {
        return Some(DrawPattern::ThreeSevens);
    }
    if draws[0] == draws[1] && draws[1] == draws[2] {
        return Some(DrawPattern::ThreeOfAKind);
    }
    let mut sorted = draws;
    sorted.sort_unstable();
    if sorted[1] == sorted[0] + 1 && sorted[2] == sorted[1] + 1 {
        return Some(DrawPattern::Straight);
    }
    None
}

pub fn resolve(rules: &VariantRules, source: &mut dyn RandomSource) -> CoreResult<Outcome> {
    let (three_sevens_bps, three_of_a_kind_bps, straight_bps) = match rules {
        VariantRules::TripleDraw {
            three_sevens_bps,
            three_of_a_kind_bps,
            straight_bps,
        } => (*three_sevens_bps, *three_of_a_kind_bps, *straight_bps),
        _ => {
            return Err(CoreError::validation(
                "triple-draw resolver called with mismatched rules",
            ))
        }
    };

    let draws = [
        source.next_in_range(DRAW_MIN, DRAW_MAX) as u8,
        source.next_in_range(DRAW_MIN, DRAW_MAX) as u8,
        source.next_in_range(DRAW_MIN, DRAW_MAX) as u8,
    ];

    let pattern = classify(draws);
    let (result, multiplier_bps) = match pattern {
        Some(DrawPattern::ThreeSevens) => (PlayResult::Win, three_sevens_bps),
        Some(DrawPattern::ThreeOfAKind) => (PlayResult::Win, three_of_a_kind_bps),
        Some(DrawPattern::Straight) => (PlayResult::Win, straight_bps),
        None => (PlayResult::Lose, 0),
    };

    Ok(Outcome {
        result,
        multiplier_bps,
        detail: OutcomeDetail::TripleDraw { draws, pattern },
    })
}
