//! Number-guess resolver
//!
//! The player picks an integer in the configured range; the engine draws
//! one uniformly from the same range. Exact match wins the configured
//! multiplier.

use crate::error::{CoreError, CoreResult};

use super::rng::RandomSource;
use super::{Outcome, OutcomeDetail, PlayResult, PlayerChoice, VariantRules};

pub fn resolve(
    rules: &VariantRules,
    choice: &PlayerChoice,
    source: &mut dyn RandomSource,
) -> CoreResult<Outcome> {
    let (min_number, max_number, multiplier_bps) = match rules {
        VariantRules::NumberGuess {
            min_number,
            max_number,
            multiplier_bps,
        } => (*min_number, *max_number, *multiplier_bps),
        _ => {
            return Err(CoreError::validation(
                "number-guess resolver called with mismatched rules",
            ))
        }
    };
    let selected = match choice {
        PlayerChoice::Number { value } => *value,
        _ => {
            return Err(CoreError::validation_field(
                "number-guess requires a number choice",
                "choice",
            ))
        }
    };

    let rolled = source.next_in_range(min_number, max_number);

    let (result, multiplier_bps) = if rolled == selected {
        (PlayResult::Win, multiplier_bps)
    } else {
        (PlayResult::Lose, 0)
    };

    Ok(Outcome {
        result,
        multiplier_bps,
        detail: OutcomeDetail::NumberGuess { selected, rolled },
    })
}
