//! File-backed settings persistence
//!
//! The settings record lives in a single JSON file. Reads go through the
//! [`AppCache`]; writes are read-modify-write under a single-writer lock and
//! land on disk through a temp file that is fsynced and renamed over the
//! original, so readers never observe a half-written record.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::AppCache;
use crate::models::Settings;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to write settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Settings record store
pub struct SettingsStore {
    path: PathBuf,
    cache: AppCache,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, cache: AppCache) -> Self {
        Self {
            path: path.into(),
            cache,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings, from cache when warm
    pub async fn load(&self) -> Arc<Settings> {
        if let Some(cached) = self.cache.get_settings().await {
            debug!("Cache HIT for settings");
            return cached;
        }

        // Fill under the writer lock so a stale read cannot replace a newer save
        let _guard = self.write_lock.lock().await;
        if let Some(cached) = self.cache.get_settings().await {
            return cached;
        }

        debug!("Cache MISS for settings");
        let settings = Arc::new(self.read_from_disk().await);
        self.cache.put_settings(settings.clone()).await;
        settings
    }

    /// Apply `f` to the latest persisted settings and save the result.
    ///
    /// The closure runs while the writer lock is held. If it returns an error
    /// nothing is written.
    pub async fn update<F, E>(&self, f: F) -> Result<Arc<Settings>, E>
    where
        F: FnOnce(&mut Settings) -> Result<(), E>,
        E: From<SettingsError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut settings = self.read_from_disk().await;
        f(&mut settings)?;

        settings.version += 1;
        settings.updated_at = Some(Utc::now());
        self.write_atomic(&settings).await?;

        info!(
            version = settings.version,
            classes = settings.classes.len(),
            "Settings saved"
        );

        let settings = Arc::new(settings);
        self.cache.put_settings(settings.clone()).await;
        Ok(settings)
    }

    async fn read_from_disk(&self) -> Settings {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<Settings>(&bytes) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Settings file {} is invalid, using defaults: {}", self.path.display(), e);
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file {} not found, using defaults", self.path.display());
                Settings::default()
            }
            Err(e) => {
                warn!("Failed to read settings file {}, using defaults: {}", self.path.display(), e);
                Settings::default()
            }
        }
    }

    async fn write_atomic(&self, settings: &Settings) -> Result<(), SettingsError> {
        let data = serde_json::to_vec_pretty(settings)?;
        let tmp_path = self.tmp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_err(parent))?;
        }

        {
            let mut file = fs::File::create(&tmp_path).await.map_err(io_err(&tmp_path))?;
            file.write_all(&data).await.map_err(io_err(&tmp_path))?;
            file.sync_all().await.map_err(io_err(&tmp_path))?;
        }

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(io_err(&self.path))?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SettingsError {
    let path = path.to_path_buf();
    move |source| SettingsError::Io { path, source }
}
