use std::path::PathBuf;

use config::{Config, File};
use directories::ProjectDirs;
use gamesdk_core::config::{Settings, DEFAULT_BASE_URL, DEFAULT_TOKEN_EXPIRATION_MARGIN_SECS};

const CONFIG_FILE_NAME: &str = "gamesdk.toml";

/// Load settings from `gamesdk.toml` in the system config directory, then
/// from `config/gamesdk.toml` under the current directory. Later files win.
/// Only `sdk.api_key` has no default.
pub fn get_configuration_with_paths(
    current_dir_path: Option<PathBuf>,
    system_config_dir_path: Option<PathBuf>,
) -> Result<Settings, config::ConfigError> {
    let config_directory = current_dir_path.unwrap_or_else(|| {
        std::env::current_dir()
            .map(|p| p.join("config"))
            .unwrap_or_else(|_| PathBuf::from("config"))
    });

    let system_config_dir = if let Some(path) = system_config_dir_path {
        path
    } else {
        ProjectDirs::from("com", "gamesdk", "gamesdk")
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config"))
    };

    let settings = Config::builder()
        .set_default("sdk.urls.registry", DEFAULT_BASE_URL)?
        .set_default("sdk.urls.statistics", DEFAULT_BASE_URL)?
        .set_default("sdk.urls.gameplay", DEFAULT_BASE_URL)?
        .set_default(
            "sdk.token_expiration_margin_secs",
            i64::from(DEFAULT_TOKEN_EXPIRATION_MARGIN_SECS),
        )?
        .set_default("log_level", "info")?
        .add_source(File::from(system_config_dir.join(CONFIG_FILE_NAME)).required(false))
        .add_source(File::from(config_directory.join(CONFIG_FILE_NAME)).required(false))
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    get_configuration_with_paths(None, None)
}
