//! Reforge outcome computation.
//!
//! Pure logic only. Randomness is injected through [`ReforgeRng`] so the
//! engine decides where entropy comes from and tests can replay a seed.

mod outcome;

pub use outcome::{OutcomeEngine, ReforgeOutcome, FAIL_ROLL_SIDES, SUCCESS_ATTEMPTS};

/// Random source consumed by the outcome engine.
pub trait ReforgeRng {
    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32;

    /// Fair coin flip.
    fn coin(&mut self) -> bool;
}
