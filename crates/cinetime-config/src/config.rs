use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "CINETIME_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub watchlist: WatchlistOptions,
    #[serde(default)]
    pub episodes: EpisodeOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Public catalog image CDN used to build poster URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistOptions {
    /// Interval of the background stats refresh
    #[serde(default = "default_stats_refresh_secs")]
    pub stats_refresh_secs: u64,
    /// Delay before re-fetching the list after a successful status update
    #[serde(default = "default_reconcile_delay_ms")]
    pub reconcile_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeOptions {
    /// Wait between an external season fetch and the store re-query
    #[serde(default = "default_refetch_delay_ms")]
    pub refetch_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Write logs to this file (daily rotation) instead of stderr; relative
    /// paths go under the log directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:5000/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_poster_size() -> String {
    "w500".to_string()
}

fn default_stats_refresh_secs() -> u64 {
    10
}

fn default_reconcile_delay_ms() -> u64 {
    500
}

fn default_refetch_delay_ms() -> u64 {
    1500
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            image_base_url: default_image_base_url(),
            poster_size: default_poster_size(),
        }
    }
}

impl Default for WatchlistOptions {
    fn default() -> Self {
        Self {
            stats_refresh_secs: default_stats_refresh_secs(),
            reconcile_delay_ms: default_reconcile_delay_ms(),
        }
    }
}

impl Default for EpisodeOptions {
    fn default() -> Self {
        Self {
            refetch_delay_ms: default_refetch_delay_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WatchlistOptions {
    pub fn stats_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.stats_refresh_secs)
    }

    pub fn reconcile_delay(&self) -> Duration {
        Duration::from_millis(self.reconcile_delay_ms)
    }
}

impl EpisodeOptions {
    pub fn refetch_delay(&self) -> Duration {
        Duration::from_millis(self.refetch_delay_ms)
    }
}

impl CatalogConfig {
    /// Full poster URL for a catalog poster path such as `/abc.jpg`
    pub fn poster_url(&self, poster_path: &str) -> Option<String> {
        if poster_path.is_empty() {
            return None;
        }
        let base = self.image_base_url.trim_end_matches('/');
        let path = poster_path.trim_start_matches('/');
        Some(format!("{}/{}/{}", base, self.poster_size, path))
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, fall back to defaults otherwise, then apply
    /// environment overrides.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(anyhow::anyhow!("api.base_url is required and cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow::anyhow!("api.base_url must start with http:// or https://: {}", url));
        }
        if self.api.timeout_secs == 0 {
            return Err(anyhow::anyhow!("api.timeout_secs must be greater than zero"));
        }
        if self.watchlist.stats_refresh_secs == 0 {
            return Err(anyhow::anyhow!("watchlist.stats_refresh_secs must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.api.base_url = "https://cinetime.example/api".to_string();
        config.watchlist.stats_refresh_secs = 30;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://cinetime.example/api");
        assert_eq!(loaded.watchlist.stats_refresh_secs, 30);
        assert_eq!(loaded.episodes.refetch_delay_ms, 1500);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"http://127.0.0.1:9000\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.watchlist.stats_refresh_interval(), Duration::from_secs(10));
        assert_eq!(config.watchlist.reconcile_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "localhost:5000".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "http://localhost:5000".to_string();
        config.watchlist.stats_refresh_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poster_url() {
        let catalog = CatalogConfig::default();
        assert_eq!(
            catalog.poster_url("/abc.jpg").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(catalog.poster_url(""), None);
    }
}
