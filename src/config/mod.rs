mod settings;

pub use settings::{
    ApiSettings, Config, DisplaySettings, DEFAULT_CURRENCY_SYMBOL, DEFAULT_DATE_FORMAT,
    DEFAULT_ENDPOINT, DEFAULT_ORGANIZATION_ID, DEFAULT_TIMEOUT_SECS,
};

use crate::error::{Result, ViewerError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.invoices/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoices") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".invoices"))
        .ok_or(ViewerError::NoConfigDir)
}

pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("config.toml")
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Load config.toml, falling back to the built-in defaults when it is absent
pub fn load_config(config_dir: &Path) -> Result<(Config, ConfigSource)> {
    let path = config_file(config_dir);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok((Config::default(), ConfigSource::Defaults));
    }
    let content = fs::read_to_string(&path)?;
    let config = toml::from_str(&content).map_err(|e| ViewerError::ConfigParse {
        path: path.clone(),
        source: e,
    })?;
    Ok((config, ConfigSource::File(path)))
}

/// Create the config directory and write the template config.toml
pub fn init_config_dir(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(ViewerError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_file(config_dir);
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"# Every key is optional. Missing keys use the values shown here.

[api]
endpoint = "https://delivr.onrender.com/invoices"
organization_id = "820117212"
timeout_secs = 10

[display]
currency_symbol = "RM"
date_format = "%-d %b %Y"   # chrono format, e.g. 5 Mar 2024
"#;
