use crate::output::{styled_table, Output};
use crate::ConfigCommands;
use cinetime_config::{Config, PathManager, API_URL_ENV, BASE_PATH_ENV};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

/// Resolve paths, create the directories and load the config file (or defaults)
pub fn load() -> Result<(Config, PathManager)> {
    let paths = PathManager::from_env().map_err(|e| eyre!("Failed to resolve paths: {}", e))?;
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create application directories: {}", e))?;
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    Ok((config, paths))
}

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::from_env().map_err(|e| eyre!("Failed to resolve paths: {}", e))?;
    match cmd {
        ConfigCommands::Show => show_config(&paths, output),
        ConfigCommands::SetUrl { url } => set_url(&paths, &url, output),
        ConfigCommands::Init { force } => init_config(&paths, force, output),
    }
}

fn show_config(paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let config = if config_file.exists() {
        Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        output.warn(format!("No configuration file at {}, showing defaults", config_file.display()));
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    let payload = json!({
        "config_file": config_file.display().to_string(),
        "credentials_file": paths.credentials_file().display().to_string(),
        "reports_dir": paths.reports_dir().display().to_string(),
        "config": config,
    });
    output.render(&payload, || {
        let mut table = styled_table(&["Setting", "Value"]);
        table.add_row(vec!["Config file".to_string(), config_file.display().to_string()]);
        table.add_row(vec!["Credentials file".to_string(), paths.credentials_file().display().to_string()]);
        table.add_row(vec!["Reports directory".to_string(), paths.reports_dir().display().to_string()]);
        table.add_row(vec!["api.base_url".to_string(), config.api.base_url.clone()]);
        table.add_row(vec!["api.timeout_secs".to_string(), config.api.timeout_secs.to_string()]);
        table.add_row(vec!["catalog.image_base_url".to_string(), config.catalog.image_base_url.clone()]);
        table.add_row(vec!["catalog.poster_size".to_string(), config.catalog.poster_size.clone()]);
        table.add_row(vec![
            "watchlist.stats_refresh_secs".to_string(),
            config.watchlist.stats_refresh_secs.to_string(),
        ]);
        table.add_row(vec![
            "watchlist.reconcile_delay_ms".to_string(),
            config.watchlist.reconcile_delay_ms.to_string(),
        ]);
        table.add_row(vec![
            "episodes.refetch_delay_ms".to_string(),
            config.episodes.refetch_delay_ms.to_string(),
        ]);
        table.add_row(vec![
            "logging.file".to_string(),
            config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(stderr)".to_string()),
        ]);
        output.table(&table);
        if std::env::var(API_URL_ENV).is_ok() {
            output.info(format!("api.base_url is overridden by {}", API_URL_ENV));
        }
        if std::env::var(BASE_PATH_ENV).is_ok() {
            output.info(format!("Files are relocated by {}", BASE_PATH_ENV));
        }
    });
    Ok(())
}

fn set_url(paths: &PathManager, url: &str, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    };
    config.api.base_url = url.trim().to_string();
    if let Err(e) = config.validate() {
        output.error(e.to_string());
        return Ok(());
    }
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save configuration: {}", e))?;
    output.success(format!("API URL set to {}", config.api.base_url));
    Ok(())
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write configuration: {}", e))?;
    output.success(format!("Configuration written to {}", config_file.display()));
    Ok(())
}
