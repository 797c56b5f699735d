//! Stage — The enum defining every canonical phase of a round
//!
//! A Stage is NOT an animation, NOT a timer callback.
//! A Stage is the SEMANTIC MEANING of a moment in the game flow.

use serde::{Deserialize, Serialize};

/// Canonical round stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin triggered, reel loop audio started
    SpinStart,

    /// Spin trigger ignored because a spin is already in flight
    SpinRejected,

    /// Reel entered its spinning state (staggered per reel)
    ReelSpinning {
        /// Which reel (0-indexed)
        reel_index: u8,
    },

    /// Reel has settled, showing final symbols
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: u8,
        /// Symbol ids on this reel (top to bottom)
        #[serde(default)]
        symbols: Vec<u32>,
    },

    /// All reels settled, reference row being evaluated
    EvaluateWins,

    /// Outcome applied, spin gate released
    SpinEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // OUTCOME
    // ═══════════════════════════════════════════════════════════════════════
    /// All reference symbols matched
    WinPresent {
        #[serde(default)]
        reward: i64,
    },

    /// Reference symbols did not all match
    LossPresent {
        #[serde(default)]
        reward: i64,
    },

    /// Transient accent and credit delta display reverted to defaults
    EffectRevert,

    // ═══════════════════════════════════════════════════════════════════════
    // CREDIT / SESSION
    // ═══════════════════════════════════════════════════════════════════════
    /// Ledger value after a reward was applied
    CreditChanged { credit: i64 },

    /// Ledger reached exactly zero, further spins disabled
    GameOver,
}

/// Stage categories for grouping and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    Outcome,
    Session,
}

impl Stage {
    /// Get the category of this stage
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart
            | Stage::SpinRejected
            | Stage::ReelSpinning { .. }
            | Stage::ReelStop { .. }
            | Stage::EvaluateWins
            | Stage::SpinEnd => StageCategory::SpinLifecycle,

            Stage::WinPresent { .. } | Stage::LossPresent { .. } | Stage::EffectRevert => {
                StageCategory::Outcome
            }

            Stage::CreditChanged { .. } | Stage::GameOver => StageCategory::Session,
        }
    }

    /// Stable snake_case name (matches the serde tag)
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart => "spin_start",
            Stage::SpinRejected => "spin_rejected",
            Stage::ReelSpinning { .. } => "reel_spinning",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinEnd => "spin_end",
            Stage::WinPresent { .. } => "win_present",
            Stage::LossPresent { .. } => "loss_present",
            Stage::EffectRevert => "effect_revert",
            Stage::CreditChanged { .. } => "credit_changed",
            Stage::GameOver => "game_over",
        }
    }

    /// Reel index for per-reel stages
    pub fn reel_index(&self) -> Option<u8> {
        match self {
            Stage::ReelSpinning { reel_index } | Stage::ReelStop { reel_index, .. } => {
                Some(*reel_index)
            }
            _ => None,
        }
    }

    /// Does this stage mark the end of a game session?
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::GameOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_matches_serde_tag() {
        let stage = Stage::ReelStop {
            reel_index: 2,
            symbols: vec![1, 4, 0],
        };
        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains(&format!("\"type\":\"{}\"", stage.type_name())));
    }

    #[test]
    fn test_categories() {
        assert_eq!(Stage::SpinStart.category(), StageCategory::SpinLifecycle);
        assert_eq!(
            Stage::WinPresent { reward: 100 }.category(),
            StageCategory::Outcome
        );
        assert_eq!(Stage::GameOver.category(), StageCategory::Session);
    }

    #[test]
    fn test_reel_index() {
        assert_eq!(Stage::ReelSpinning { reel_index: 1 }.reel_index(), Some(1));
        assert_eq!(Stage::EvaluateWins.reel_index(), None);
        assert!(Stage::GameOver.is_terminal());
        assert!(!Stage::SpinEnd.is_terminal());
    }
}
