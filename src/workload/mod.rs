//! Synthetic workload primitives.
//!
//! Each function here produces one characteristic latency, CPU or status
//! pattern. Handlers combine them with logging; nothing here touches HTTP.

pub mod random;

use std::time::Duration;

pub use random::{RandomSource, ScriptedRandom, ThreadRandom};

/// Fixed wait simulated by `/io_task`.
pub const IO_TASK_DELAY: Duration = Duration::from_millis(1000);

/// Iterations of busy arithmetic performed by `/cpu_task`.
pub const CPU_TASK_ITERATIONS: u64 = 1000;

/// Status slots for `/random_status`. 200 holds two of the five slots.
pub const STATUS_SLOTS: [u16; 5] = [200, 200, 300, 400, 500];

/// Upper bound (inclusive) of the `/random_sleep` delay in seconds.
pub const MAX_SLEEP_SECS: u64 = 5;

/// Burn CPU on the calling thread.
///
/// The result of each iteration is discarded; `black_box` keeps the
/// optimizer from eliding the loop.
pub fn busy_work(iterations: u64) {
    for i in 0..iterations {
        std::hint::black_box(i.wrapping_mul(i).wrapping_mul(i));
    }
}

/// Pick one of [`STATUS_SLOTS`] uniformly.
pub fn pick_status(rng: &dyn RandomSource) -> u16 {
    STATUS_SLOTS[rng.below(STATUS_SLOTS.len())]
}

/// Pick a whole-second delay in `0..=MAX_SLEEP_SECS`.
pub fn pick_sleep(rng: &dyn RandomSource) -> Duration {
    let secs = rng.below(MAX_SLEEP_SECS as usize + 1) as u64;
    Duration::from_secs(secs)
}
