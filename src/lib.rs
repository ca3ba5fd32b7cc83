//! Registration and payment service for the Metropolitano regatta.
//!
//! Serves the registration form data, prices competitor registrations by boat
//! class, hands competitors to the payment provider's checkout and trainers to
//! their external form, and lets an administrator edit the settings record.

pub mod cache;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod payments;
pub mod pricing;
pub mod routes;
pub mod store;

use std::sync::Arc;

use cache::AppCache;
use config::Config;
use payments::PaymentGateway;
use store::SettingsStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: AppCache,
    pub settings: Arc<SettingsStore>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(config: Config, payments: Arc<dyn PaymentGateway>) -> Self {
        let cache = AppCache::new();
        let settings = Arc::new(SettingsStore::new(config.settings_path.clone(), cache.clone()));
        Self {
            config: Arc::new(config),
            cache,
            settings,
            payments,
        }
    }
}

pub use routes::router;
