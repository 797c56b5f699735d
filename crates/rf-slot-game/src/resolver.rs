//! Result resolution — the all-reels-match rule on the reference row

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{OutcomeStyle, OutcomeTable};
use crate::symbols::Symbol;

/// Outcome of a settled spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Loss,
}

impl RoundOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, RoundOutcome::Win)
    }

    /// Style (reward, accent, duration) configured for this outcome
    pub fn style<'a>(&self, table: &'a OutcomeTable) -> &'a OutcomeStyle {
        match self {
            RoundOutcome::Win => &table.win,
            RoundOutcome::Loss => &table.loss,
        }
    }
}

/// Win iff every reference symbol is identical.
///
/// Two matching and one different is a loss; an empty row is a loss.
pub fn evaluate<'a>(reference_symbols: impl IntoIterator<Item = &'a Symbol>) -> RoundOutcome {
    let distinct: HashSet<&Symbol> = reference_symbols.into_iter().collect();
    if distinct.len() == 1 {
        RoundOutcome::Win
    } else {
        RoundOutcome::Loss
    }
}

/// Everything decided when a round resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResolution {
    /// Spin number within the session (1-based)
    pub spin_index: u64,
    pub outcome: RoundOutcome,
    pub reference_symbols: Vec<Symbol>,
    pub reward: i64,
    pub credit_after: i64,
    /// Logical time the round resolved at
    pub resolved_at_ms: f64,
    pub ended_game: bool,
}
