//! Spin coordination types: the re-entrancy gate and the scheduled steps

use serde::{Deserialize, Serialize};

/// Process-wide spin gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpinState {
    #[default]
    Idle,
    Spinning,
}

/// Result of a spin trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinTrigger {
    /// Reel starts and the stop phase were scheduled
    Started,
    /// A spin is already in flight; nothing changed
    IgnoredSpinning,
    /// The ledger hit zero; spins are disabled
    IgnoredGameOver,
}

impl SpinTrigger {
    pub fn is_started(&self) -> bool {
        matches!(self, SpinTrigger::Started)
    }
}

/// Delayed step of a round, executed by the session when its time comes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum ScheduledTask {
    /// Staggered start of one reel
    StartReel { reel_index: usize },
    /// Stop every reel, release the gate and resolve the round
    StopPhase,
    /// Restore the default frame accent of spin `round`
    RevertAccent { round: u64 },
    /// Restore the plain credit text of spin `round` and silence the win loop
    RevertCredit { round: u64 },
}

impl ScheduledTask {
    /// Spin whose effects this task reverts
    pub fn round(&self) -> Option<u64> {
        match self {
            ScheduledTask::RevertAccent { round } | ScheduledTask::RevertCredit { round } => {
                Some(*round)
            }
            ScheduledTask::StartReel { .. } | ScheduledTask::StopPhase => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScheduledTask::StartReel { .. } => "start_reel",
            ScheduledTask::StopPhase => "stop_phase",
            ScheduledTask::RevertAccent { .. } => "revert_accent",
            ScheduledTask::RevertCredit { .. } => "revert_credit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_tasks_carry_their_round() {
        assert_eq!(ScheduledTask::RevertAccent { round: 3 }.round(), Some(3));
        assert_eq!(ScheduledTask::RevertCredit { round: 4 }.round(), Some(4));
        assert_eq!(ScheduledTask::StopPhase.round(), None);
        assert_eq!(ScheduledTask::StartReel { reel_index: 1 }.round(), None);
    }

    #[test]
    fn test_task_serialization() {
        let json = serde_json::to_string(&ScheduledTask::RevertCredit { round: 2 }).unwrap();
        assert_eq!(json, r#"{"task":"revert_credit","round":2}"#);
    }

    #[test]
    fn test_trigger_started() {
        assert!(SpinTrigger::Started.is_started());
        assert!(!SpinTrigger::IgnoredSpinning.is_started());
        assert!(!SpinTrigger::IgnoredGameOver.is_started());
    }
}
