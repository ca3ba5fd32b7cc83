//! In-memory caching using moka
//!
//! Keeps the parsed settings record in memory so that every request does not
//! hit the filesystem. Entries expire after a short TTL so manual edits of the
//! settings file are picked up without a restart.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::models::Settings;

const SETTINGS_KEY: &str = "settings";

/// Application cache holding the settings singleton
#[derive(Clone)]
pub struct AppCache {
    /// Settings record (singleton)
    pub settings: Cache<String, Arc<Settings>>,
}

impl AppCache {
    /// Create a new cache instance with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(60))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            settings: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub async fn get_settings(&self) -> Option<Arc<Settings>> {
        self.settings.get(SETTINGS_KEY).await
    }

    pub async fn put_settings(&self, settings: Arc<Settings>) {
        self.settings.insert(SETTINGS_KEY.to_string(), settings).await;
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            settings_cached: self.settings.entry_count() > 0,
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.settings.invalidate_all();
        info!("All caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub settings_cached: bool,
}
