//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod reforge;

pub use reforge::{
    CancelReason, CycleReport, ReforgeDeps, ReforgeReply, ReforgeService, ServiceStatus,
};
