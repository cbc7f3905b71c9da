//! Catalog vocabulary shared by every layer: item types and modifier kinds.

pub mod item_type;
pub mod modifier;

pub use item_type::{ItemForm, ItemType};
pub use modifier::{ModifierCatalog, ModifierKind, StandardCatalog, MODIFIER_ID_SPACE};
