//! Domain entities

pub mod item;

pub use item::ItemSnapshot;
