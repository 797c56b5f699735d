//! Timing profiles and the logical clock driving every delayed step

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Timing profile for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Instant (no delays, for testing)
    Instant,
    /// Values edited by hand
    Custom,
}

/// Spin lifecycle timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Delay between consecutive reel starts (ms)
    pub stagger_delay_ms: f64,

    /// Time from trigger to the stop phase (ms), independent of reel count
    pub spin_duration_ms: f64,

    /// Length of one reel motion frame (ms)
    pub tick_interval_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            stagger_delay_ms: 300.0,
            spin_duration_ms: 2500.0,
            tick_interval_ms: 16.0,
        }
    }

    /// Turbo mode: normal timing at double speed
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            ..Self::normal().scaled(0.5)
        }
    }

    /// Every reel starts and stops on the trigger instant
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            stagger_delay_ms: 0.0,
            spin_duration_ms: 0.0,
            tick_interval_ms: 16.0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            stagger_delay_ms: self.stagger_delay_ms * factor,
            spin_duration_ms: self.spin_duration_ms * factor,
            tick_interval_ms: self.tick_interval_ms,
        }
    }

    /// Offset of reel `reel_index`'s start from the trigger
    pub fn reel_start_offset(&self, reel_index: usize) -> f64 {
        reel_index as f64 * self.stagger_delay_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Handle returned by [`Scheduler::schedule_after`]
pub type TaskId = u64;

#[derive(Debug)]
struct Entry<T> {
    fire_at_ms: f64,
    seq: TaskId,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed: BinaryHeap is a max-heap, the earliest (fire time, seq) must pop first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at_ms
            .total_cmp(&self.fire_at_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Logical millisecond clock with a queue of delayed tasks
///
/// Tasks fire in non-decreasing fire time; tasks sharing a fire time fire
/// in the order they were scheduled. Time only moves when the owner
/// advances it, so tests can step through intermediate states.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_seq: TaskId,
    queue: BinaryHeap<Entry<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current logical time
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Queue `task` to fire `delay_ms` after the current logical time
    pub fn schedule_after(&mut self, delay_ms: f64, task: T) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            fire_at_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            task,
        });
        seq
    }

    /// Fire time of the earliest pending task
    pub fn next_fire_at(&self) -> Option<f64> {
        self.queue.peek().map(|e| e.fire_at_ms)
    }

    /// Pop the earliest task if it is due at or before `until_ms`,
    /// moving the clock to its fire time
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(f64, T)> {
        if self.next_fire_at()? > until_ms {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now_ms = self.now_ms.max(entry.fire_at_ms);
        Some((entry.fire_at_ms, entry.task))
    }

    /// Move the clock forward; never moves backwards
    pub fn advance_to(&mut self, ms: f64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Number of pending tasks
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
