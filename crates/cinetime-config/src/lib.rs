pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{ApiConfig, CatalogConfig, Config, EpisodeOptions, LoggingConfig, WatchlistOptions, API_URL_ENV};
pub use credentials::CredentialStore;
pub use paths::{PathManager, BASE_PATH_ENV};
