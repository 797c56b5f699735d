//! StageTrace — The sequence of stage events for one spin round
//!
//! A trace captures the full timeline of a round, from the trigger to
//! the reversion of its transient effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};

/// A complete trace of stage events for one spin round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Game identifier
    pub game_id: String,

    /// Spin ID within session
    #[serde(default)]
    pub spin_id: Option<String>,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded (wall clock, informational only)
    pub recorded_at: DateTime<Utc>,

    /// Custom metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            game_id: game_id.into(),
            spin_id: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Add an event and return self (builder pattern)
    pub fn with_event(mut self, event: StageEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Set spin ID
    pub fn with_spin(mut self, spin_id: impl Into<String>) -> Self {
        self.spin_id = Some(spin_id.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.type_name() == type_name)
            .collect()
    }

    /// Find first event matching predicate
    pub fn find_event<F>(&self, predicate: F) -> Option<&StageEvent>
    where
        F: Fn(&StageEvent) -> bool,
    {
        self.events.iter().find(|e| predicate(e))
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.type_name() == type_name)
    }

    /// Get all reel stop events
    pub fn reel_stops(&self) -> Vec<&StageEvent> {
        self.events_by_type("reel_stop")
    }

    /// Reward of the resolved outcome, if the round got that far
    pub fn reward(&self) -> Option<i64> {
        self.events.iter().find_map(|e| match e.stage {
            Stage::WinPresent { reward } | Stage::LossPresent { reward } => Some(reward),
            _ => None,
        })
    }

    pub fn is_win(&self) -> bool {
        self.has_stage("win_present")
    }

    /// Validate trace has required stages
    pub fn validate(&self) -> TraceValidation {
        let has_win = self.has_stage("win_present");
        let has_loss = self.has_stage("loss_present");

        TraceValidation {
            has_spin_start: self.has_stage("spin_start"),
            has_spin_end: self.has_stage("spin_end"),
            reel_spinning_count: self.events_by_type("reel_spinning").len(),
            reel_stop_count: self.reel_stops().len(),
            has_single_outcome: has_win != has_loss,
            has_effect_revert: self.has_stage("effect_revert"),
            is_ordered: self
                .events
                .windows(2)
                .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub has_spin_start: bool,
    pub has_spin_end: bool,
    pub reel_spinning_count: usize,
    pub reel_stop_count: usize,
    pub has_single_outcome: bool,
    pub has_effect_revert: bool,
    pub is_ordered: bool,
}

impl TraceValidation {
    /// Check that a round with `reel_count` reels is complete
    pub fn is_complete(&self, reel_count: usize) -> bool {
        self.has_spin_start
            && self.has_spin_end
            && self.reel_spinning_count == reel_count
            && self.reel_stop_count == reel_count
            && self.has_single_outcome
            && self.is_ordered
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if !self.has_spin_start {
            warnings.push("Missing SPIN_START event");
        }
        if !self.has_spin_end {
            warnings.push("Missing SPIN_END event");
        }
        if !self.has_single_outcome {
            warnings.push("Expected exactly one WIN_PRESENT or LOSS_PRESENT event");
        }
        if !self.is_ordered {
            warnings.push("Events are not in timestamp order");
        }
        if self.has_spin_end && !self.has_effect_revert {
            warnings.push("Outcome effects have not reverted yet");
        }

        warnings
    }
}
