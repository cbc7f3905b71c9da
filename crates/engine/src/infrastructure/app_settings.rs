//! Process-level settings read from the environment.
//!
//! Service behavior (messages, delays, fail chance, allow-list) lives in the
//! per-service config record; these settings only decide where that record
//! is stored and which adapters the binary wires in.
//!
//! | variable | default |
//! |----------|---------|
//! | `REFORGE_CONFIG_DIR` | `./reforge-config` |
//! | `REFORGE_SERVICE` | `blacksmith` |
//! | `REFORGE_SEED` | unset (system entropy) |
//! | `REFORGE_STARTING_BALANCE` | unset (no economy) |
//! | `REFORGE_BASE_PRICE` | `10` |

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub config_dir: PathBuf,
    pub service_key: String,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    /// Enables the in-memory wallet with this opening balance.
    pub starting_balance: Option<f64>,
    pub base_price: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("./reforge-config"),
            service_key: "blacksmith".to_string(),
            seed: None,
            starting_balance: None,
            base_price: 10.0,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Unparseable values fall
    /// back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let config_dir = lookup("REFORGE_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.config_dir);
        let service_key = lookup("REFORGE_SERVICE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.service_key);
        let seed = parse_or_warn(&lookup, "REFORGE_SEED");
        let starting_balance = parse_or_warn(&lookup, "REFORGE_STARTING_BALANCE");
        let base_price =
            parse_or_warn(&lookup, "REFORGE_BASE_PRICE").unwrap_or(defaults.base_price);

        Self {
            config_dir,
            service_key,
            seed,
            starting_balance,
            base_price,
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}
