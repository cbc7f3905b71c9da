//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod app_settings;
pub mod clock;
pub mod config_store;
pub mod console;
pub mod ports;
pub mod pricing;
pub mod scheduler;
pub mod wallet;
