//! Application state and composition.

use std::sync::Arc;

use reforge_domain::{DomainError, ServiceConfig, ServiceId, StandardCatalog};

use crate::infrastructure::{
    app_settings::EngineSettings,
    clock::{SeededRandom, SystemClock, SystemRandom},
    config_store::JsonFileConfigStore,
    console::{ConsoleDelivery, ConsoleNotifier},
    ports::{ConfigStoreError, ConfigStorePort, RandomPort, SchedulerError, WalletPort},
    pricing::{CatalogEligibility, TablePricing},
    scheduler::TokioDelayScheduler,
    wallet::{InMemoryWallet, Unmetered},
};
use crate::use_cases::{ReforgeDeps, ReforgeService};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config store error: {0}")]
    ConfigStore(#[from] ConfigStoreError),
    #[error("Invalid service config: {0}")]
    InvalidConfig(#[from] DomainError),
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Main application state.
///
/// Holds the reforge service and the concrete adapters the console binary
/// needs direct access to.
pub struct App {
    pub settings: EngineSettings,
    pub reforge: Arc<ReforgeService>,
    /// Present only when a starting balance is configured.
    pub wallet: Option<Arc<InMemoryWallet>>,
    pub delivery: Arc<ConsoleDelivery>,
    scheduler: Arc<TokioDelayScheduler>,
}

impl App {
    /// Wires the service from settings, storing its config as JSON under
    /// `settings.config_dir`. Must be called inside a tokio runtime.
    pub async fn new(settings: EngineSettings) -> Result<Self, AppError> {
        let store = JsonFileConfigStore::new(&settings.config_dir);
        Self::with_store(settings, &store).await
    }

    pub async fn with_store(
        settings: EngineSettings,
        store: &dyn ConfigStorePort,
    ) -> Result<Self, AppError> {
        let config = load_service_config(store, &settings.service_key).await?;
        let scheduler = Arc::new(TokioDelayScheduler::from_current()?);

        let random: Arc<dyn RandomPort> = match settings.seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded random source");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(SystemRandom::new()),
        };

        let wallet = settings
            .starting_balance
            .map(|balance| Arc::new(InMemoryWallet::new(balance)));
        let wallet_port: Arc<dyn WalletPort> = match &wallet {
            Some(wallet) => wallet.clone(),
            None => Arc::new(Unmetered),
        };

        let delivery = Arc::new(ConsoleDelivery::new());
        let deps = ReforgeDeps {
            eligibility: Arc::new(CatalogEligibility),
            pricing: Arc::new(TablePricing::new(settings.base_price)),
            wallet: wallet_port,
            notifier: Arc::new(ConsoleNotifier::new(&settings.service_key)),
            delivery: delivery.clone(),
            scheduler: scheduler.clone(),
            random,
            clock: Arc::new(SystemClock::new()),
            catalog: Arc::new(StandardCatalog),
        };

        let reforge = ReforgeService::new(ServiceId::new(), Arc::new(config), deps);
        tracing::info!(
            service = %reforge.id(),
            key = %settings.service_key,
            economy = wallet.is_some(),
            "Reforge service ready"
        );

        Ok(Self {
            settings,
            reforge,
            wallet,
            delivery,
            scheduler,
        })
    }

    /// Stops accepting delayed work and hands back any in-flight item.
    pub fn shutdown(&self) {
        self.scheduler.close();
        if let Some(actor) = self.reforge.shutdown() {
            tracing::info!(actor = %actor, "Returned in-flight item on shutdown");
        }
    }
}

/// Loads the config stored under `key`. A missing record is replaced by the
/// defaults, which are written back so the file documents every setting.
pub async fn load_service_config(
    store: &dyn ConfigStorePort,
    key: &str,
) -> Result<ServiceConfig, AppError> {
    let Some(record) = store.load(key).await? else {
        let config = ServiceConfig::default();
        store.save(key, &config.to_record()).await?;
        tracing::info!(key, "No stored config; wrote defaults");
        return Ok(config);
    };

    let (config, unrecognized) = ServiceConfig::from_record(&record)?;
    for name in &unrecognized {
        tracing::warn!(key, item = %name, "Skipping unrecognized reforgeable item");
    }
    tracing::debug!(
        key,
        allowed = config.reforgeable_items().len(),
        fail_chance = config.fail_chance().percent(),
        "Loaded service config"
    );
    Ok(config)
}
