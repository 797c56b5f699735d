//! Symbol definitions and the deck symbols are drawn from

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::random::RandomSource;

/// A symbol definition
///
/// Symbols carry identity only; equality is what the result rule reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Position in the catalog
    pub id: u32,
    /// Symbol name (asset key, e.g. "slot-symbol-cherry")
    pub name: String,
}

impl Symbol {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reference catalog of the classic game
pub const CLASSIC_SYMBOLS: [&str; 5] = [
    "slot-symbol-seven",
    "slot-symbol-cherry",
    "slot-symbol-bell",
    "slot-symbol-bar",
    "slot-symbol-lemon",
];

/// Fixed catalog with a uniform picker
#[derive(Debug, Clone)]
pub struct SymbolDeck {
    symbols: Vec<Symbol>,
}

impl SymbolDeck {
    /// Build a deck from symbol names; ids follow catalog order
    pub fn new<S: AsRef<str>>(names: &[S]) -> SlotResult<Self> {
        if names.is_empty() {
            return Err(SlotError::InvalidConfig(
                "symbol catalog is empty".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut symbols = Vec::with_capacity(names.len());
        for (id, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(SlotError::InvalidConfig(format!(
                    "symbol #{id} has an empty name"
                )));
            }
            if !seen.insert(name) {
                return Err(SlotError::InvalidConfig(format!(
                    "duplicate symbol '{name}' in catalog"
                )));
            }
            symbols.push(Symbol::new(id as u32, name));
        }

        Ok(Self { symbols })
    }

    /// The reference five-symbol deck
    pub fn classic() -> Self {
        Self {
            symbols: CLASSIC_SYMBOLS
                .iter()
                .enumerate()
                .map(|(id, name)| Symbol::new(id as u32, *name))
                .collect(),
        }
    }

    /// Uniform pick, independent of every previous pick
    pub fn pick_random<R: RandomSource + ?Sized>(&self, rng: &mut R) -> &Symbol {
        let index = rng.pick_index(self.symbols.len());
        &self.symbols[index.min(self.symbols.len() - 1)]
    }

    /// Get symbol by ID
    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.get(id as usize)
    }

    /// Get symbol by name
    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.get(symbol.id) == Some(symbol)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed deck
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolDeck {
    fn default() -> Self {
        Self::classic()
    }
}
