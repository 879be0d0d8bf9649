//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Some(dir) = read_data_dir_key(&config_path) {
            return dir;
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Database file location inside the data folder
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("reqwatch.db")
}

/// Read the `data_dir` key from a TOML config file, if present
fn read_data_dir_key(config_path: &Path) -> Option<PathBuf> {
    let toml_content = std::fs::read_to_string(config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&toml_content).ok()?;
    let dir = config.get("data_dir").and_then(|v| v.as_str())?;
    debug!(config = %config_path.display(), "Using data_dir from config file");
    Some(PathBuf::from(dir))
}

/// Locate the configuration file for the platform
///
/// Checks the user config directory first; on Linux `/etc/reqwatch/config.toml`
/// is consulted as a system-wide fallback.
fn find_config_file() -> Result<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("reqwatch").join("config.toml")) {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/reqwatch/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default data folder path
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("reqwatch"))
        .unwrap_or_else(|| PathBuf::from("./reqwatch_data"))
}
