//! Item snapshot - the value handed to and returned from a reforge session
//!
//! A snapshot is owned by exactly one party at a time: the requester's hand,
//! an in-flight session, or the outcome engine. It is moved, never shared.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{ItemType, ModifierKind};

/// State of one item at a point in time.
///
/// Modifier kinds are unique per item (keyed map, iterated in kind order)
/// and wear stays within `[0, item_type.max_wear()]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    item_type: ItemType,
    modifiers: BTreeMap<ModifierKind, u8>,
    wear: u32,
}

impl ItemSnapshot {
    /// A pristine item with no modifiers.
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type,
            modifiers: BTreeMap::new(),
            wear: 0,
        }
    }

    /// Builder for a worn item.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `wear` exceeds the type's max wear.
    pub fn with_wear(mut self, wear: u32) -> Result<Self, DomainError> {
        let max = self.item_type.max_wear();
        if wear > max {
            return Err(DomainError::validation(format!(
                "Wear {} exceeds max wear {} for {}",
                wear, max, self.item_type
            )));
        }
        self.wear = wear;
        Ok(self)
    }

    /// Builder for an item carrying a modifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for level 0.
    pub fn with_modifier(mut self, kind: ModifierKind, level: u8) -> Result<Self, DomainError> {
        if level == 0 {
            return Err(DomainError::validation(format!(
                "Modifier {} must have a level of at least 1",
                kind
            )));
        }
        self.modifiers.insert(kind, level);
        Ok(self)
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn wear(&self) -> u32 {
        self.wear
    }

    pub fn max_wear(&self) -> u32 {
        self.item_type.max_wear()
    }

    /// Sets wear, clamped to the type's max wear.
    pub fn set_wear(&mut self, wear: u32) {
        self.wear = wear.min(self.max_wear());
    }

    pub fn modifiers(&self) -> impl Iterator<Item = (ModifierKind, u8)> + '_ {
        self.modifiers.iter().map(|(kind, level)| (*kind, *level))
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    pub fn level_of(&self, kind: ModifierKind) -> Option<u8> {
        self.modifiers.get(&kind).copied()
    }

    /// Applies `kind` at `level`, replacing any existing level.
    /// A level of 0 removes the modifier.
    pub fn set_modifier(&mut self, kind: ModifierKind, level: u8) {
        if level == 0 {
            self.modifiers.remove(&kind);
        } else {
            self.modifiers.insert(kind, level);
        }
    }

    pub fn remove_modifier(&mut self, kind: ModifierKind) -> Option<u8> {
        self.modifiers.remove(&kind)
    }

    /// Sum of all modifier levels.
    pub fn total_levels(&self) -> u32 {
        self.modifiers.values().map(|l| u32::from(*l)).sum()
    }
}

impl fmt::Display for ItemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (wear {}/{})",
            self.item_type.display_name(),
            self.wear,
            self.max_wear()
        )?;
        if !self.modifiers.is_empty() {
            let parts: Vec<String> = self
                .modifiers
                .iter()
                .map(|(kind, level)| format!("{} {}", kind, level))
                .collect();
            write!(f, " [{}]", parts.join(", "))?;
        }
        Ok(())
    }
}
