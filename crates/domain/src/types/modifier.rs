//! Modifier kinds and the catalog boundary.
//!
//! Modifiers are enchantment-like traits carried by an item at an integer
//! level. Kinds live in a sparse numeric id space so that drawing a random id
//! can miss; the catalog decides which ids exist and which item types accept
//! them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::item_type::{ItemForm, ItemType};

/// Size of the standard modifier id space. Ids in `[0, MODIFIER_ID_SPACE)`
/// may or may not map to a kind.
pub const MODIFIER_ID_SPACE: u32 = 100;

/// A modifier kind from the standard catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    Protection,
    FireProtection,
    FeatherFalling,
    BlastProtection,
    ProjectileProtection,
    Respiration,
    AquaAffinity,
    Sharpness,
    Smite,
    BaneOfArthropods,
    Knockback,
    FireAspect,
    Looting,
    Efficiency,
    SilkTouch,
    Unbreaking,
    Fortune,
    Power,
    Punch,
    Flame,
    Infinity,
}

impl ModifierKind {
    pub const ALL: &'static [ModifierKind] = &[
        Self::Protection,
        Self::FireProtection,
        Self::FeatherFalling,
        Self::BlastProtection,
        Self::ProjectileProtection,
        Self::Respiration,
        Self::AquaAffinity,
        Self::Sharpness,
        Self::Smite,
        Self::BaneOfArthropods,
        Self::Knockback,
        Self::FireAspect,
        Self::Looting,
        Self::Efficiency,
        Self::SilkTouch,
        Self::Unbreaking,
        Self::Fortune,
        Self::Power,
        Self::Punch,
        Self::Flame,
        Self::Infinity,
    ];

    /// Numeric id in the standard id space.
    pub fn id(self) -> u32 {
        match self {
            Self::Protection => 0,
            Self::FireProtection => 1,
            Self::FeatherFalling => 2,
            Self::BlastProtection => 3,
            Self::ProjectileProtection => 4,
            Self::Respiration => 5,
            Self::AquaAffinity => 6,
            Self::Sharpness => 16,
            Self::Smite => 17,
            Self::BaneOfArthropods => 18,
            Self::Knockback => 19,
            Self::FireAspect => 20,
            Self::Looting => 21,
            Self::Efficiency => 32,
            Self::SilkTouch => 33,
            Self::Unbreaking => 34,
            Self::Fortune => 35,
            Self::Power => 48,
            Self::Punch => 49,
            Self::Flame => 50,
            Self::Infinity => 51,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }

    pub fn max_level(self) -> u8 {
        match self {
            Self::Protection
            | Self::FireProtection
            | Self::FeatherFalling
            | Self::BlastProtection
            | Self::ProjectileProtection => 4,
            Self::Sharpness
            | Self::Smite
            | Self::BaneOfArthropods
            | Self::Efficiency
            | Self::Power => 5,
            Self::Respiration | Self::Looting | Self::Unbreaking | Self::Fortune => 3,
            Self::Knockback | Self::FireAspect | Self::Punch => 2,
            Self::AquaAffinity | Self::SilkTouch | Self::Flame | Self::Infinity => 1,
        }
    }

    /// Whether an item of the given type can carry this modifier.
    pub fn can_apply_to(self, item_type: ItemType) -> bool {
        let form = item_type.form();
        match self {
            Self::Protection
            | Self::FireProtection
            | Self::BlastProtection
            | Self::ProjectileProtection => form.is_armor(),
            Self::FeatherFalling => form == ItemForm::Boots,
            Self::Respiration | Self::AquaAffinity => form == ItemForm::Helmet,
            Self::Sharpness
            | Self::Smite
            | Self::BaneOfArthropods
            | Self::Knockback
            | Self::FireAspect
            | Self::Looting => form == ItemForm::Sword,
            Self::Efficiency | Self::SilkTouch | Self::Fortune => form.is_digger(),
            Self::Unbreaking => item_type.max_wear() > 0,
            Self::Power | Self::Punch | Self::Flame | Self::Infinity => form == ItemForm::Bow,
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Protection => "protection",
            Self::FireProtection => "fire_protection",
            Self::FeatherFalling => "feather_falling",
            Self::BlastProtection => "blast_protection",
            Self::ProjectileProtection => "projectile_protection",
            Self::Respiration => "respiration",
            Self::AquaAffinity => "aqua_affinity",
            Self::Sharpness => "sharpness",
            Self::Smite => "smite",
            Self::BaneOfArthropods => "bane_of_arthropods",
            Self::Knockback => "knockback",
            Self::FireAspect => "fire_aspect",
            Self::Looting => "looting",
            Self::Efficiency => "efficiency",
            Self::SilkTouch => "silk_touch",
            Self::Unbreaking => "unbreaking",
            Self::Fortune => "fortune",
            Self::Power => "power",
            Self::Punch => "punch",
            Self::Flame => "flame",
            Self::Infinity => "infinity",
        };
        write!(f, "{}", name)
    }
}

/// Registry of modifier kinds the outcome engine draws from.
///
/// The registry is owned by the host; `StandardCatalog` mirrors the
/// built-in kinds.
pub trait ModifierCatalog: Send + Sync {
    /// Upper bound (exclusive) of ids to draw from.
    fn id_space(&self) -> u32;

    /// Kind registered under `id`, if any.
    fn lookup(&self, id: u32) -> Option<ModifierKind>;

    fn max_level(&self, kind: ModifierKind) -> u8;

    /// Capability check: can an item of `item_type` accept `kind`.
    fn accepts(&self, kind: ModifierKind, item_type: ItemType) -> bool;
}

/// The built-in modifier catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalog;

impl ModifierCatalog for StandardCatalog {
    fn id_space(&self) -> u32 {
        MODIFIER_ID_SPACE
    }

    fn lookup(&self, id: u32) -> Option<ModifierKind> {
        ModifierKind::from_id(id)
    }

    fn max_level(&self, kind: ModifierKind) -> u8 {
        kind.max_level()
    }

    fn accepts(&self, kind: ModifierKind, item_type: ItemType) -> bool {
        kind.can_apply_to(item_type)
    }
}
