//! Daily-spin resolver
//!
//! Not a bet: a weighted draw against the configured reward table. Weights
//! are normalized into a cumulative distribution in table order and a
//! uniform [0, 1) draw selects the first boundary at or past the draw, so
//! the same table always maps the same draw to the same reward.

use crate::error::{CoreError, CoreResult};

use super::rng::RandomSource;
use super::{Outcome, OutcomeDetail, PlayResult, WeightedReward};

pub fn resolve(rewards: &[WeightedReward], source: &mut dyn RandomSource) -> CoreResult<Outcome> {
    let total: u64 = rewards.iter().map(|r| r.weight as u64).sum();
    if total == 0 {
        return Err(CoreError::validation_field(
            "spin reward table needs at least one positive weight",
            "rules.rewards",
        ));
    }

    let draw = source.next_unit();

    let mut cumulative = 0u64;
    for slot in rewards {
        // Zero-weight slots occupy no share of the distribution
        if slot.weight == 0 {
            continue;
        }
        cumulative += slot.weight as u64;
        let boundary = cumulative as f64 / total as f64;
        if boundary >= draw {
            return Ok(Outcome {
                result: PlayResult::Win,
                multiplier_bps: 0, // spins pay from the table, not the bet
                detail: OutcomeDetail::DailySpin {
                    reward: slot.reward.clone(),
                },
            });
        }
    }

    // draw < 1.0 and the final boundary is exactly 1.0, so the loop always
    // returns; this is only reachable through floating-point edge rounding.
    let last = rewards
        .iter()
        .rev()
        .find(|r| r.weight > 0)
        .unwrap_or(&rewards[rewards.len() - 1]);
    Ok(Outcome {
        result: PlayResult::Win,
        multiplier_bps: 0,
        detail: OutcomeDetail::DailySpin {
            reward: last.reward.clone(),
        },
    })
}
