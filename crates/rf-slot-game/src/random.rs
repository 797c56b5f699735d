//! Injectable random sources for symbol selection

use std::collections::VecDeque;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Uniform index picker
///
/// Every symbol selection in the game goes through this trait so that
/// outcomes can be reproduced from a seed or forced from a script.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero for a valid deck.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

/// ChaCha8-backed source, reproducible for a given seed
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl SeededRandom {
    /// Create a new source with optional seed (OS entropy otherwise)
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self { rng, seed }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// Seed this source was built from, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Replays scripted indices before falling back to an inner source
///
/// Scripted values are reduced modulo `len`, so one script can be reused
/// with catalogs of different sizes.
#[derive(Debug, Clone)]
pub struct ScriptedRandom<R> {
    script: VecDeque<usize>,
    inner: R,
}

impl<R: RandomSource> ScriptedRandom<R> {
    pub fn new(script: impl IntoIterator<Item = usize>, inner: R) -> Self {
        Self {
            script: script.into_iter().collect(),
            inner,
        }
    }

    /// Append more scripted picks
    pub fn extend(&mut self, picks: impl IntoIterator<Item = usize>) {
        self.script.extend(picks);
    }

    /// Scripted picks not consumed yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: RandomSource> RandomSource for ScriptedRandom<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self.script.pop_front() {
            Some(index) => index % len,
            None => self.inner.pick_index(len),
        }
    }
}
