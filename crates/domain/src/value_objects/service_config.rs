//! Reforge service configuration
//!
//! `ServiceConfig` is the effective, validated configuration of one service
//! instance. It is immutable once loaded; the engine shares it behind an
//! `Arc`.
//!
//! # Persistence
//!
//! `ServiceConfigRecord` is the stored shape. Every field is optional:
//! loading overrides a compiled-in default only when the field is present,
//! while saving always writes every effective value so the stored file is
//! self-describing.
//!
//! ```json
//! {
//!   "reforgeable-items": ["diamond-sword", "iron-boots"],
//!   "messages": { "cost": "It will cost <price> to reforge that <item>." },
//!   "delays-in-seconds": { "minimum": 5, "maximum": 30 },
//!   "percent-chance-to-fail-reforge": 10
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::ItemType;

use super::price::Price;

/// Placeholder replaced by the quoted price.
pub const PRICE_PLACEHOLDER: &str = "<price>";
/// Placeholder replaced by the item's display name.
pub const ITEM_PLACEHOLDER: &str = "<item>";

pub const DEFAULT_MIN_DELAY_SECS: u32 = 5;
pub const DEFAULT_MAX_DELAY_SECS: u32 = 30;
pub const DEFAULT_FAIL_CHANCE_PERCENT: u8 = 10;

// ============================================================================
// Delay bounds
// ============================================================================

/// Inclusive bounds for the randomized processing delay, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayBounds {
    min_secs: u32,
    max_secs: u32,
}

impl DelayBounds {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `min_secs > max_secs`.
    pub fn new(min_secs: u32, max_secs: u32) -> Result<Self, DomainError> {
        if min_secs > max_secs {
            return Err(DomainError::validation(format!(
                "Minimum delay ({}s) cannot exceed maximum delay ({}s)",
                min_secs, max_secs
            )));
        }
        Ok(Self { min_secs, max_secs })
    }

    pub fn min_secs(&self) -> u32 {
        self.min_secs
    }

    pub fn max_secs(&self) -> u32 {
        self.max_secs
    }
}

impl Default for DelayBounds {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_MIN_DELAY_SECS,
            max_secs: DEFAULT_MAX_DELAY_SECS,
        }
    }
}

// ============================================================================
// Fail chance
// ============================================================================

/// Probability, in whole percent, that a reforge takes the failure branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FailChance(u8);

impl FailChance {
    pub const NEVER: FailChance = FailChance(0);
    pub const ALWAYS: FailChance = FailChance(100);

    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `percent > 100`.
    pub fn new(percent: u8) -> Result<Self, DomainError> {
        if percent > 100 {
            return Err(DomainError::validation(format!(
                "Fail chance must be between 0 and 100 percent (got {})",
                percent
            )));
        }
        Ok(Self(percent))
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl Default for FailChance {
    fn default() -> Self {
        Self(DEFAULT_FAIL_CHANCE_PERCENT)
    }
}

impl TryFrom<u8> for FailChance {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FailChance> for u8 {
    fn from(chance: FailChance) -> u8 {
        chance.0
    }
}

// ============================================================================
// Message templates
// ============================================================================

/// The user-facing messages a service sends.
///
/// Templates may contain `<price>` and `<item>` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplates {
    pub busy_with_player: String,
    pub busy_with_reforge: String,
    pub cost: String,
    pub invalid_item: String,
    pub start_reforge: String,
    pub successful_reforge: String,
    pub fail_reforge: String,
    pub insufficient_funds: String,
    /// Sent when the requester comes back holding something other than the
    /// quoted item.
    pub item_changed: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            busy_with_player: "I'm busy at the moment. Come back later!".to_string(),
            busy_with_reforge: "I'm working on it. Be patient!".to_string(),
            cost: "It will cost <price> to reforge that <item>. Click again to reforge!"
                .to_string(),
            invalid_item: "I'm sorry, but I don't know how to reforge that!".to_string(),
            start_reforge: "Ok, let's see what I can do...".to_string(),
            successful_reforge: "There you go! All better!".to_string(),
            fail_reforge: "Whoops! Didn't mean to do that! Maybe next time?".to_string(),
            insufficient_funds: "You don't have enough money to reforge that item!".to_string(),
            item_changed: "Changed your mind? Show me the item again when you're ready."
                .to_string(),
        }
    }
}

/// Fills the `<price>` and `<item>` placeholders of a template.
pub fn render(template: &str, price: Option<Price>, item: Option<ItemType>) -> String {
    let mut out = template.to_string();
    if let Some(price) = price {
        out = out.replace(PRICE_PLACEHOLDER, &price.to_string());
    }
    if let Some(item) = item {
        out = out.replace(ITEM_PLACEHOLDER, &item.display_name());
    }
    out
}

// ============================================================================
// ServiceConfig
// ============================================================================

/// Effective configuration of one reforge service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceConfig {
    reforgeable_items: Vec<ItemType>,
    messages: MessageTemplates,
    delays: DelayBounds,
    fail_chance: FailChance,
}

impl ServiceConfig {
    pub fn with_reforgeable_items(mut self, items: Vec<ItemType>) -> Self {
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        self.reforgeable_items = unique;
        self
    }

    pub fn with_messages(mut self, messages: MessageTemplates) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_delays(mut self, delays: DelayBounds) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_fail_chance(mut self, fail_chance: FailChance) -> Self {
        self.fail_chance = fail_chance;
        self
    }

    /// Ordered allow-list. Empty means every processable item is accepted.
    pub fn reforgeable_items(&self) -> &[ItemType] {
        &self.reforgeable_items
    }

    /// Allow-list check. An empty allow-list permits everything.
    pub fn allows(&self, item_type: ItemType) -> bool {
        self.reforgeable_items.is_empty() || self.reforgeable_items.contains(&item_type)
    }

    pub fn messages(&self) -> &MessageTemplates {
        &self.messages
    }

    pub fn delays(&self) -> DelayBounds {
        self.delays
    }

    pub fn fail_chance(&self) -> FailChance {
        self.fail_chance
    }

    /// Builds the effective config from a stored record, starting from the
    /// defaults and overriding only the fields present in the record.
    ///
    /// Allow-list entries that do not name a known item type are skipped and
    /// returned alongside the config.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the resulting delay bounds are
    /// inverted or the fail chance is above 100.
    pub fn from_record(record: &ServiceConfigRecord) -> Result<(Self, Vec<String>), DomainError> {
        let mut config = Self::default();
        let mut unrecognized = Vec::new();

        if let Some(names) = &record.reforgeable_items {
            let mut items = Vec::with_capacity(names.len());
            for name in names {
                match name.parse::<ItemType>() {
                    Ok(item) => items.push(item),
                    Err(_) => unrecognized.push(name.clone()),
                }
            }
            config = config.with_reforgeable_items(items);
        }

        if let Some(messages) = &record.messages {
            let m = &mut config.messages;
            let overrides = [
                (&mut m.busy_with_player, &messages.busy_with_player),
                (&mut m.busy_with_reforge, &messages.busy_with_reforge),
                (&mut m.cost, &messages.cost),
                (&mut m.invalid_item, &messages.invalid_item),
                (&mut m.start_reforge, &messages.start_reforge),
                (&mut m.successful_reforge, &messages.successful_reforge),
                (&mut m.fail_reforge, &messages.fail_reforge),
                (&mut m.insufficient_funds, &messages.insufficient_funds),
                (&mut m.item_changed, &messages.item_changed),
            ];
            for (target, value) in overrides {
                if let Some(value) = value {
                    *target = value.clone();
                }
            }
        }

        if let Some(delays) = &record.delays {
            let min = delays.minimum.unwrap_or(config.delays.min_secs);
            let max = delays.maximum.unwrap_or(config.delays.max_secs);
            config.delays = DelayBounds::new(min, max)?;
        }

        if let Some(percent) = record.fail_chance_percent {
            config.fail_chance = FailChance::new(percent)?;
        }

        Ok((config, unrecognized))
    }

    /// The stored shape of this config with every field written.
    pub fn to_record(&self) -> ServiceConfigRecord {
        let m = &self.messages;
        ServiceConfigRecord {
            reforgeable_items: Some(
                self.reforgeable_items
                    .iter()
                    .map(|item| item.config_key())
                    .collect(),
            ),
            messages: Some(MessagesRecord {
                busy_with_player: Some(m.busy_with_player.clone()),
                busy_with_reforge: Some(m.busy_with_reforge.clone()),
                cost: Some(m.cost.clone()),
                invalid_item: Some(m.invalid_item.clone()),
                start_reforge: Some(m.start_reforge.clone()),
                successful_reforge: Some(m.successful_reforge.clone()),
                fail_reforge: Some(m.fail_reforge.clone()),
                insufficient_funds: Some(m.insufficient_funds.clone()),
                item_changed: Some(m.item_changed.clone()),
            }),
            delays: Some(DelaysRecord {
                minimum: Some(self.delays.min_secs),
                maximum: Some(self.delays.max_secs),
            }),
            fail_chance_percent: Some(self.fail_chance.percent()),
        }
    }
}

// ============================================================================
// Persistence record
// ============================================================================

/// Stored form of a service configuration. Absent fields keep defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceConfigRecord {
    #[serde(
        rename = "reforgeable-items",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reforgeable_items: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<MessagesRecord>,

    #[serde(
        rename = "delays-in-seconds",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delays: Option<DelaysRecord>,

    #[serde(
        rename = "percent-chance-to-fail-reforge",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fail_chance_percent: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessagesRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_with_player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_with_reforge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_reforge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_reforge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_reforge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insufficient_funds: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_changed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DelaysRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u32>,
}
