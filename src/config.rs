//! Process configuration
//!
//! Loaded from environment variables (a `.env` file is honored by `main`):
//! - `HOST` / `PORT`: bind address (default `0.0.0.0:5000`)
//! - `URL_BASE`: public base URL used for payment back-urls
//! - `SETTINGS_PATH`: settings record location (default `settings.json`)
//! - `STATIC_DIR`: directory served under `/static` (default `static`)
//! - `MERCADO_PAGO_ACCESS_TOKEN`: payment provider token (required)
//! - `MERCADO_PAGO_API_URL`: payment provider API root
//! - `ADMIN_PASSWORD`: admin password; admin endpoints are disabled when unset

use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

pub const DEFAULT_URL_BASE: &str = "https://metropolitanopagos-inscripciones.onrender.com";
pub const DEFAULT_API_URL: &str = "https://api.mercadopago.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Public base URL, without trailing slash
    pub url_base: String,
    pub settings_path: PathBuf,
    pub static_dir: PathBuf,
    pub access_token: String,
    pub api_url: String,
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("url_base", &self.url_base)
            .field("settings_path", &self.settings_path)
            .field("static_dir", &self.static_dir)
            .field("api_url", &self.api_url)
            .field("admin_enabled", &self.admin_password.is_some())
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Build config from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 5000,
        };
        let bind_addr: SocketAddr =
            format!("{}:{}", host, port)
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: "HOST",
                    reason: e.to_string(),
                })?;

        let url_base = normalize_base_url(
            "URL_BASE",
            &lookup("URL_BASE").unwrap_or_else(|| DEFAULT_URL_BASE.to_string()),
        )?;
        let api_url = normalize_base_url(
            "MERCADO_PAGO_API_URL",
            &lookup("MERCADO_PAGO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let access_token = lookup("MERCADO_PAGO_ACCESS_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("MERCADO_PAGO_ACCESS_TOKEN"))?;

        let settings_path = lookup("SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("settings.json"));

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));

        let admin_password = lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty());

        Ok(Self {
            bind_addr,
            url_base,
            settings_path,
            static_dir,
            access_token,
            api_url,
            admin_password,
        })
    }
}

fn normalize_base_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}
