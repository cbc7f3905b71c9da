//! Item type catalog
//!
//! Host item types known to the reforge service. Each type carries a form
//! (what kind of equipment it is) and its maximum wear, which is the
//! durability budget of a fresh item.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The equipment shape of an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemForm {
    Sword,
    Pickaxe,
    Axe,
    Shovel,
    Hoe,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    Bow,
    FishingRod,
    Shears,
    FlintAndSteel,
    /// Anything that is neither a tool nor armor
    Misc,
}

impl ItemForm {
    /// Weapons, diggers, and utility tools.
    pub fn is_tool(self) -> bool {
        matches!(
            self,
            Self::Sword
                | Self::Pickaxe
                | Self::Axe
                | Self::Shovel
                | Self::Hoe
                | Self::Bow
                | Self::FishingRod
                | Self::Shears
                | Self::FlintAndSteel
        )
    }

    pub fn is_armor(self) -> bool {
        matches!(
            self,
            Self::Helmet | Self::Chestplate | Self::Leggings | Self::Boots
        )
    }

    /// Pickaxes, axes and shovels.
    pub fn is_digger(self) -> bool {
        matches!(self, Self::Pickaxe | Self::Axe | Self::Shovel)
    }
}

macro_rules! define_item_types {
    ($($variant:ident => ($name:literal, $form:ident, $max_wear:expr)),+ $(,)?) => {
        /// A host item type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum ItemType {
            $($variant),+
        }

        impl ItemType {
            /// Every known item type, in declaration order.
            pub const ALL: &'static [ItemType] = &[$(ItemType::$variant),+];

            /// Canonical snake_case name (e.g. `diamond_sword`).
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            pub fn form(self) -> ItemForm {
                match self {
                    $(Self::$variant => ItemForm::$form),+
                }
            }

            /// Wear at which the item is at end of life. Zero for items
            /// that do not wear.
            pub fn max_wear(self) -> u32 {
                match self {
                    $(Self::$variant => $max_wear),+
                }
            }
        }
    };
}

define_item_types! {
    WoodenSword => ("wooden_sword", Sword, 59),
    StoneSword => ("stone_sword", Sword, 131),
    IronSword => ("iron_sword", Sword, 250),
    GoldenSword => ("golden_sword", Sword, 32),
    DiamondSword => ("diamond_sword", Sword, 1561),
    WoodenPickaxe => ("wooden_pickaxe", Pickaxe, 59),
    StonePickaxe => ("stone_pickaxe", Pickaxe, 131),
    IronPickaxe => ("iron_pickaxe", Pickaxe, 250),
    GoldenPickaxe => ("golden_pickaxe", Pickaxe, 32),
    DiamondPickaxe => ("diamond_pickaxe", Pickaxe, 1561),
    IronAxe => ("iron_axe", Axe, 250),
    DiamondAxe => ("diamond_axe", Axe, 1561),
    IronShovel => ("iron_shovel", Shovel, 250),
    DiamondShovel => ("diamond_shovel", Shovel, 1561),
    IronHoe => ("iron_hoe", Hoe, 250),
    LeatherHelmet => ("leather_helmet", Helmet, 55),
    IronHelmet => ("iron_helmet", Helmet, 165),
    DiamondHelmet => ("diamond_helmet", Helmet, 363),
    IronChestplate => ("iron_chestplate", Chestplate, 240),
    DiamondChestplate => ("diamond_chestplate", Chestplate, 528),
    IronLeggings => ("iron_leggings", Leggings, 225),
    DiamondLeggings => ("diamond_leggings", Leggings, 495),
    IronBoots => ("iron_boots", Boots, 195),
    DiamondBoots => ("diamond_boots", Boots, 429),
    Bow => ("bow", Bow, 384),
    FishingRod => ("fishing_rod", FishingRod, 64),
    Shears => ("shears", Shears, 238),
    FlintAndSteel => ("flint_and_steel", FlintAndSteel, 64),
    Stick => ("stick", Misc, 0),
    Cobblestone => ("cobblestone", Misc, 0),
    Apple => ("apple", Misc, 0),
}

impl ItemType {
    /// Name as written in configuration files (`diamond-sword`).
    pub fn config_key(self) -> String {
        self.name().replace('_', "-")
    }

    /// Human readable name used in messages (`diamond sword`).
    pub fn display_name(self) -> String {
        self.name().replace('_', " ")
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| DomainError::not_found("item type", s.trim()))
    }
}
