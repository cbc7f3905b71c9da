//! Reforge engine library.
//!
//! Runs reforge services: one requester at a time, quote then confirm,
//! delayed outcome, item handed back.
//!
//! ## Structure
//!
//! - `use_cases/` - The reforge session controller
//! - `infrastructure/` - Ports and their adapters (timers, storage, wallet, console)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test doubles shared by unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{App, AppError};
