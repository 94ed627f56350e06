//! Injectable randomness.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of uniform integers for the random endpoints.
pub trait RandomSource: Send + Sync + 'static {
    /// Uniform integer in `0..upper`. `upper` is never zero.
    fn below(&self, upper: usize) -> usize;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Replays a fixed sequence, wrapping around at the end.
///
/// Each value is reduced modulo `upper`, so a script written for one
/// endpoint stays in range for another.
#[derive(Debug)]
pub struct ScriptedRandom {
    values: Vec<usize>,
    cursor: AtomicUsize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<usize>) -> Self {
        assert!(!values.is_empty(), "script needs at least one value");
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&self, upper: usize) -> usize {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[i] % upper
    }
}
