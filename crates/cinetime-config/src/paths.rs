use anyhow::Result;
use std::path::{Path, PathBuf};

/// Relocates every file under one directory (containers, tests)
pub const BASE_PATH_ENV: &str = "CINETIME_BASE_PATH";

/// On-disk layout: `config.toml` and `credentials.toml` at the base,
/// downloaded reports under `data/reports`, relative log files under `logs`.
#[derive(Debug, Clone)]
pub struct PathManager {
    base: PathBuf,
}

impl PathManager {
    /// Platform layout, e.g. `~/.config/cinetime` on Linux
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinetime");
        Ok(Self::from_base(base))
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self { base }
    }

    /// `CINETIME_BASE_PATH` when set, the platform layout otherwise
    pub fn from_env() -> Result<Self> {
        match std::env::var(BASE_PATH_ENV) {
            Ok(base) if !base.trim().is_empty() => Ok(Self::from_base(PathBuf::from(base.trim()))),
            _ => Self::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base.join("data")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base.join("logs")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir().join("reports")
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.base.join("credentials.toml")
    }

    /// Relative log paths from `[logging] file` live under the log directory
    pub fn resolve_log_file(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.log_dir().join(file)
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::create_dir_all(self.reports_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}
