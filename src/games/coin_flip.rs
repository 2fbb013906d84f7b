//! Coin-flip resolver
//!
//! The player picks one of the two configured sides; the engine flips
//! uniformly between them. The multiplier is typically below 2.0x, which
//! is where the house edge lives.

use crate::error::{CoreError, CoreResult};

use super::rng::RandomSource;
use super::{Outcome, OutcomeDetail, PlayResult, PlayerChoice, VariantRules};

pub fn resolve(
    rules: &VariantRules,
    choice: &PlayerChoice,
    source: &mut dyn RandomSource,
) -> CoreResult<Outcome> {
    let (sides, multiplier_bps) = match rules {
        VariantRules::CoinFlip {
            sides,
            multiplier_bps,
        } => (sides, *multiplier_bps),
        _ => {
            return Err(CoreError::validation(
                "coin-flip resolver called with mismatched rules",
            ))
        }
    };
    let chosen = match choice {
        PlayerChoice::Side { value } => value.clone(),
        _ => {
            return Err(CoreError::validation_field(
                "coin-flip requires a side choice",
                "choice",
            ))
        }
    };

    let flipped = sides[source.next_in_range(0, 1) as usize].clone();

    let (result, multiplier_bps) = if flipped == chosen {
        (PlayResult::Win, multiplier_bps)
    } else {
        (PlayResult::Lose, 0)
    };

    Ok(Outcome {
        result,
        multiplier_bps,
        detail: OutcomeDetail::CoinFlip { chosen, flipped },
    })
}
