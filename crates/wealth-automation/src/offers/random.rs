use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt::Debug;

/// Source of uniform choices for CTA templates and fallback offers.
pub trait RandomSource: Debug {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Production source backed by `StdRng`.
#[derive(Debug)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Replays a fixed list of picks, wrapping each into range. Once the script
/// runs out every further pick is `0`.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    picks: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn choose_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}
