//! Clock and random implementations.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use reforge_domain::ReforgeRng;

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Adapts any `rand` generator to the domain's random source.
pub struct RngSource<R>(pub R);

impl<R: RngCore> ReforgeRng for RngSource<R> {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.0.gen_range(0..bound)
    }

    fn coin(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }
}

fn draw_inclusive<R: Rng>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        draw_inclusive(&mut rand::thread_rng(), min, max)
    }

    fn outcome_rng(&self) -> Box<dyn ReforgeRng + Send> {
        Box::new(RngSource(StdRng::from_entropy()))
    }
}

/// Seeded random - the same seed replays the same delays and outcomes.
///
/// Each outcome gets its own generator seeded from the master stream, so a
/// replayed sequence of interactions reproduces the same delays and outcomes.
pub struct SeededRandom {
    master: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            master: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomPort for SeededRandom {
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        let mut master = self.master.lock().unwrap_or_else(PoisonError::into_inner);
        draw_inclusive(&mut *master, min, max)
    }

    fn outcome_rng(&self) -> Box<dyn ReforgeRng + Send> {
        let seed = self
            .master
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_u64();
        Box::new(RngSource(StdRng::seed_from_u64(seed)))
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
