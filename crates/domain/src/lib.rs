//! Reforge domain: item snapshots, catalogs, service configuration and the
//! pure outcome computation. No I/O, no async, no RNG crate.

pub mod entities;
pub mod error;
pub mod ids;
pub mod reforge;
pub mod types;
pub mod value_objects;

pub use entities::ItemSnapshot;
pub use error::DomainError;
pub use ids::{ActorId, ServiceId};
pub use reforge::{OutcomeEngine, ReforgeOutcome, ReforgeRng};
pub use types::{ItemForm, ItemType, ModifierCatalog, ModifierKind, StandardCatalog};
pub use value_objects::{
    render, DelayBounds, DelaysRecord, FailChance, MessageTemplates, MessagesRecord, Price,
    ServiceConfig, ServiceConfigRecord,
};
