//! Value objects for the reforge domain

mod price;
mod service_config;

pub use price::Price;
pub use service_config::{
    render, DelayBounds, DelaysRecord, FailChance, MessageTemplates, MessagesRecord,
    ServiceConfig, ServiceConfigRecord, DEFAULT_FAIL_CHANCE_PERCENT, DEFAULT_MAX_DELAY_SECS,
    DEFAULT_MIN_DELAY_SECS, ITEM_PLACEHOLDER, PRICE_PLACEHOLDER,
};
