//! Outcome engine: game variants, rules, and per-variant resolvers
//!
//! Each supported game variant has a pure resolver function taking the
//! variant's rules, the player's choice, and an injected [`RandomSource`].
//! Resolvers hold no state and never block; the orchestrator owns money
//! movement and persistence around them.

pub mod coin_flip;
pub mod daily_spin;
pub mod definition;
pub mod number_guess;
pub mod rng;
pub mod triple_draw;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use rng::RandomSource;

/// Closed set of supported game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    NumberGuess,
    TripleDraw,
    CoinFlip,
    DailySpin,
}

impl GameVariant {
    /// Stable identifier used in filters and serialized records
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::NumberGuess => "number_guess",
            GameVariant::TripleDraw => "triple_draw",
            GameVariant::CoinFlip => "coin_flip",
            GameVariant::DailySpin => "daily_spin",
        }
    }
}

/// Multiplier scale: 10_000 basis points = 1.0x
pub const MULTIPLIER_SCALE: u32 = 10_000;

/// Compute a payout from a bet and a basis-point multiplier (floor division)
pub fn payout(bet: u64, multiplier_bps: u32) -> u64 {
    ((bet as u128 * multiplier_bps as u128) / MULTIPLIER_SCALE as u128) as u64
}

/// One reward slot in a daily-spin table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedReward {
    pub reward: RewardDescriptor,
    /// Relative weight; normalized against the table total at draw time
    pub weight: u32,
}

/// Opaque description of a spin reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDescriptor {
    /// Stable reward code, e.g. `"kc_small"` or `"jackpot"`
    pub code: String,
    /// KC credited when this reward lands (may be zero for non-currency rewards)
    pub kc_amount: u64,
}

/// Per-variant rules, each carrying exactly the fields its resolver needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum VariantRules {
    NumberGuess {
        min_number: i64,
        max_number: i64,
        multiplier_bps: u32,
    },
    TripleDraw {
        three_sevens_bps: u32,
        three_of_a_kind_bps: u32,
        straight_bps: u32,
    },
    CoinFlip {
        sides: [String; 2],
        multiplier_bps: u32,
    },
    DailySpin {
        rewards: Vec<WeightedReward>,
    },
}

impl VariantRules {
    /// The variant these rules belong to
    pub fn variant(&self) -> GameVariant {
        match self {
            VariantRules::NumberGuess { .. } => GameVariant::NumberGuess,
            VariantRules::TripleDraw { .. } => GameVariant::TripleDraw,
            VariantRules::CoinFlip { .. } => GameVariant::CoinFlip,
            VariantRules::DailySpin { .. } => GameVariant::DailySpin,
        }
    }

    /// Check internal consistency of the rules themselves
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            VariantRules::NumberGuess {
                min_number,
                max_number,
                multiplier_bps,
            } => {
                if min_number >= max_number {
                    return Err(CoreError::validation_field(
                        "min_number must be below max_number",
                        "rules.min_number",
                    ));
                }
                if *multiplier_bps == 0 {
                    return Err(CoreError::validation_field(
                        "multiplier must be positive",
                        "rules.multiplier_bps",
                    ));
                }
                Ok(())
            }
            VariantRules::TripleDraw {
                three_sevens_bps,
                three_of_a_kind_bps,
                straight_bps,
            } => {
                // Precedence only makes sense with descending payouts
                if !(three_sevens_bps >= three_of_a_kind_bps
                    && three_of_a_kind_bps >= straight_bps
                    && *straight_bps > 0)
                {
                    return Err(CoreError::validation_field(
                        "pattern multipliers must be positive and non-increasing",
                        "rules.multipliers",
                    ));
                }
                Ok(())
            }
            VariantRules::CoinFlip {
                sides,
                multiplier_bps,
            } => {
                if sides[0].is_empty() || sides[1].is_empty() || sides[0] == sides[1] {
                    return Err(CoreError::validation_field(
                        "coin-flip sides must be two distinct labels",
                        "rules.sides",
                    ));
                }
                if *multiplier_bps == 0 {
                    return Err(CoreError::validation_field(
                        "multiplier must be positive",
                        "rules.multiplier_bps",
                    ));
                }
                Ok(())
            }
            VariantRules::DailySpin { rewards } => {
                if rewards.is_empty() {
                    return Err(CoreError::validation_field(
                        "spin reward table must not be empty",
                        "rules.rewards",
                    ));
                }
                if rewards.iter().all(|r| r.weight == 0) {
                    return Err(CoreError::validation_field(
                        "spin reward table needs at least one positive weight",
                        "rules.rewards",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Player input for a single play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerChoice {
    /// Number-guess selection
    Number { value: i64 },
    /// Coin-flip side selection
    Side { value: String },
    /// No input required (daily spin)
    Spin,
}

/// Win/lose verdict for a resolved play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayResult {
    Win,
    Lose,
}

/// Matched triple-draw pattern, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPattern {
    ThreeSevens,
    ThreeOfAKind,
    Straight,
}

/// Per-variant result detail, recorded on the play history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum OutcomeDetail {
    NumberGuess {
        selected: i64,
        rolled: i64,
    },
    TripleDraw {
        draws: [u8; 3],
        pattern: Option<DrawPattern>,
    },
    CoinFlip {
        chosen: String,
        flipped: String,
    },
    DailySpin {
        reward: RewardDescriptor,
    },
}

/// Resolved verdict for a single play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub result: PlayResult,
    /// Payout multiplier in basis points; zero on a loss
    pub multiplier_bps: u32,
    pub detail: OutcomeDetail,
}

/// Validate a player choice against the rules, without drawing anything
pub fn validate_choice(rules: &VariantRules, choice: &PlayerChoice) -> CoreResult<()> {
    match (rules, choice) {
        (
            VariantRules::NumberGuess {
                min_number,
                max_number,
                ..
            },
            PlayerChoice::Number { value },
        ) => {
            if value < min_number || value > max_number {
                return Err(CoreError::validation_field(
                    format!(
                        "selected number {} outside [{}, {}]",
                        value, min_number, max_number
                    ),
                    "choice.value",
                ));
            }
            Ok(())
        }
        (VariantRules::CoinFlip { sides, .. }, PlayerChoice::Side { value }) => {
            if !sides.contains(value) {
                return Err(CoreError::validation_field(
                    format!("side {:?} is not one of the configured sides", value),
                    "choice.value",
                ));
            }
            Ok(())
        }
        (VariantRules::TripleDraw { .. }, PlayerChoice::Spin) => Ok(()),
        (VariantRules::DailySpin { .. }, PlayerChoice::Spin) => Ok(()),
        (rules, choice) => Err(CoreError::validation_field(
            format!(
                "choice {:?} does not match game variant {}",
                choice,
                rules.variant().as_str()
            ),
            "choice",
        )),
    }
}

/// Resolve a play against the given rules using the injected random source
///
/// The choice must already have passed [`validate_choice`]; a mismatched
/// choice here is rejected the same way rather than panicking.
pub fn resolve(
    rules: &VariantRules,
    choice: &PlayerChoice,
    source: &mut dyn RandomSource,
) -> CoreResult<Outcome> {
    validate_choice(rules, choice)?;

    match rules {
        VariantRules::NumberGuess { .. } => number_guess::resolve(rules, choice, source),
        VariantRules::TripleDraw { .. } => triple_draw::resolve(rules, source),
        VariantRules::CoinFlip { .. } => coin_flip::resolve(rules, choice, source),
        VariantRules::DailySpin { rewards } => daily_spin::resolve(rewards, source),
    }
}
