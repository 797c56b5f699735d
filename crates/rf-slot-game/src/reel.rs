//! Reels — vertical columns of symbol slots with an idle/spinning lifecycle

use serde::{Deserialize, Serialize};

use crate::config::ReelLayout;
use crate::random::RandomSource;
use crate::symbols::{Symbol, SymbolDeck};

/// Slot index read across all reels to decide a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceRow(pub usize);

impl ReferenceRow {
    /// Middle slot of a reel with `slots` slots (index 1 for three slots)
    pub fn middle(slots: usize) -> Self {
        Self(slots / 2)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Reel lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReelState {
    #[default]
    Idle,
    Spinning,
}

/// One symbol position on a reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Vertical position (grows downwards)
    pub position: f64,
    pub symbol: Symbol,
}

/// A vertical column with a fixed number of slots
#[derive(Debug, Clone)]
pub struct Reel {
    index: usize,
    slots: Vec<Slot>,
    state: ReelState,
    velocity: f64,
}

impl Reel {
    /// Create an idle reel with random symbols at the resting offsets
    pub fn new<R: RandomSource + ?Sized>(
        index: usize,
        slot_count: usize,
        layout: &ReelLayout,
        deck: &SymbolDeck,
        rng: &mut R,
    ) -> Self {
        let slots = (0..slot_count)
            .map(|slot| Slot {
                position: layout.resting_offset(slot),
                symbol: deck.pick_random(rng).clone(),
            })
            .collect();

        Self {
            index,
            slots,
            state: ReelState::Idle,
            velocity: 0.0,
        }
    }

    /// Idle → Spinning. Returns false if the reel was already spinning.
    pub fn enter_spinning(&mut self, velocity: f64) -> bool {
        if self.state == ReelState::Spinning {
            return false;
        }
        self.state = ReelState::Spinning;
        self.velocity = velocity;
        true
    }

    /// Move every slot by one motion step of `dt_ms`.
    ///
    /// Slots past the wrap threshold re-enter above the first resting
    /// offset with a fresh symbol. Returns the indices of wrapped slots.
    /// No-op while idle.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        dt_ms: f64,
        layout: &ReelLayout,
        deck: &SymbolDeck,
        rng: &mut R,
    ) -> Vec<usize> {
        if self.state != ReelState::Spinning || dt_ms <= 0.0 {
            return Vec::new();
        }

        let dy = self.velocity * dt_ms / 1000.0;
        let mut wrapped = Vec::new();
        for (slot_index, slot) in self.slots.iter_mut().enumerate() {
            slot.position += dy;
            if slot.position > layout.wrap_threshold {
                slot.position = layout.wrap_reset_y;
                slot.symbol = deck.pick_random(rng).clone();
                wrapped.push(slot_index);
            }
        }

        if !wrapped.is_empty() {
            log::trace!("Reel {} wrapped slots {:?}", self.index, wrapped);
        }
        wrapped
    }

    /// Spinning → Idle: stop motion, snap every slot to its resting offset
    /// and commit a freshly picked symbol. Settles even if already idle.
    pub fn leave_spinning<R: RandomSource + ?Sized>(
        &mut self,
        layout: &ReelLayout,
        deck: &SymbolDeck,
        rng: &mut R,
    ) {
        self.state = ReelState::Idle;
        self.velocity = 0.0;
        for (slot_index, slot) in self.slots.iter_mut().enumerate() {
            slot.position = layout.resting_offset(slot_index);
            slot.symbol = deck.pick_random(rng).clone();
        }
    }

    /// Symbol in the reference row
    pub fn symbol_at(&self, row: ReferenceRow) -> Option<&Symbol> {
        self.slots.get(row.index()).map(|s| &s.symbol)
    }

    /// Symbol ids top to bottom
    pub fn symbol_ids(&self) -> Vec<u32> {
        self.slots.iter().map(|s| s.symbol.id).collect()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> ReelState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state == ReelState::Spinning
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}
