// Random selection of the next lot.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed indices used to pick the next player.
///
/// The engine only ever asks for an index into a non-empty pool, so
/// implementations may assume `len > 0`.
pub trait IndexPicker: Send + Sync {
    /// Return an index in `0..len`, each equally likely.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Production picker backed by a standard RNG.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn from_entropy() -> Self {
        RandomPicker {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a picker with a fixed seed (for reproducible auctions and tests).
    pub fn with_seed(seed: u64) -> Self {
        RandomPicker {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IndexPicker for RandomPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Picker that replays a fixed script of indices, wrapping around.
///
/// Each scripted value is reduced modulo the pool size so a script stays
/// valid as the pool shrinks.
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    script: Vec<usize>,
    next: usize,
}

impl ScriptedPicker {
    pub fn new(script: Vec<usize>) -> Self {
        ScriptedPicker { script, next: 0 }
    }

    /// Always pick the first eligible player.
    pub fn first() -> Self {
        ScriptedPicker::new(vec![0])
    }
}

impl IndexPicker for ScriptedPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        if self.script.is_empty() || len == 0 {
            return 0;
        }
        let value = self.script[self.next % self.script.len()];
        self.next += 1;
        value % len
    }
}
