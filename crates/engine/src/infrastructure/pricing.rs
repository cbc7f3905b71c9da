//! Table-driven pricing and catalog-backed eligibility.

use std::collections::HashMap;

use reforge_domain::{ItemSnapshot, ItemType, Price};

use crate::infrastructure::ports::{EligibilityPort, PricingPort};

/// Price = base (per-type override or default) + wear surcharge + modifier
/// surcharge.
#[derive(Debug, Clone)]
pub struct TablePricing {
    default_base: f64,
    per_wear_point: f64,
    per_modifier_level: f64,
    base_overrides: HashMap<ItemType, f64>,
}

impl TablePricing {
    pub fn new(default_base: f64) -> Self {
        Self {
            default_base,
            per_wear_point: 0.0,
            per_modifier_level: 0.0,
            base_overrides: HashMap::new(),
        }
    }

    pub fn with_per_wear_point(mut self, amount: f64) -> Self {
        self.per_wear_point = amount;
        self
    }

    pub fn with_per_modifier_level(mut self, amount: f64) -> Self {
        self.per_modifier_level = amount;
        self
    }

    pub fn with_base_for(mut self, item_type: ItemType, amount: f64) -> Self {
        self.base_overrides.insert(item_type, amount);
        self
    }
}

impl Default for TablePricing {
    fn default() -> Self {
        Self::new(10.0)
            .with_per_wear_point(0.01)
            .with_per_modifier_level(1.5)
    }
}

impl PricingPort for TablePricing {
    fn quote(&self, item: &ItemSnapshot) -> Price {
        let base = self
            .base_overrides
            .get(&item.item_type())
            .copied()
            .unwrap_or(self.default_base);
        let total = base
            + self.per_wear_point * f64::from(item.wear())
            + self.per_modifier_level * f64::from(item.total_levels());
        // A misconfigured table (negative amounts) quotes free rather than failing
        Price::new(total).unwrap_or(Price::FREE)
    }
}

/// Eligibility derived from the item type's form.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogEligibility;

impl EligibilityPort for CatalogEligibility {
    fn is_tool(&self, item: &ItemSnapshot) -> bool {
        item.item_type().form().is_tool()
    }

    fn is_armor(&self, item: &ItemSnapshot) -> bool {
        item.item_type().form().is_armor()
    }
}
