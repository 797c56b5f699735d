//! Credit ledger and its text formatting

use serde::{Deserialize, Serialize};

/// Session-scoped credit balance
///
/// No clamping: the balance may go negative. Only an exact zero ends the
/// game, and that check belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLedger {
    value: i64,
}

impl CreditLedger {
    pub fn new(starting_credit: i64) -> Self {
        Self {
            value: starting_credit,
        }
    }

    /// Apply a signed delta and return the new balance
    pub fn apply_delta(&mut self, amount: i64) -> i64 {
        self.value = self.value.saturating_add(amount);
        self.value
    }

    pub fn current_value(&self) -> i64 {
        self.value
    }

    /// Exactly zero: the end-of-game condition
    pub fn is_depleted(&self) -> bool {
        self.value == 0
    }

    /// Plain balance text, e.g. `Credit: 80€`
    pub fn display_text(&self) -> String {
        format_credit(self.value)
    }
}

/// `Credit: {value}€`
pub fn format_credit(value: i64) -> String {
    format!("Credit: {value}€")
}

/// Transient delta text: `Credit: +100€`, `Credit: -20€`, `Credit: 0€`
pub fn format_delta(reward: i64) -> String {
    let sign = if reward > 0 { "+" } else { "" };
    format!("Credit: {sign}{reward}€")
}
