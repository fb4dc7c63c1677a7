//! Loading configuration from disk.

use super::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name for depmerge within the user config dir.
const CONFIG_DIR: &str = "depmerge";

/// Filename for configuration.
const CONFIG_FILE: &str = "config.toml";

/// GraphQL caps `first:` at 100 nodes per connection.
const MAX_CHANGED_FILES_LIMIT: u32 = 100;

/// Default config location, e.g. `~/.config/depmerge/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load configuration.
///
/// An explicit path must exist. The default path is optional: when it
/// doesn't exist the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config_from(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => {
            debug!("no config file, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    if !(1..=MAX_CHANGED_FILES_LIMIT).contains(&config.changed_files_limit) {
        return Err(Error::Config(format!(
            "{}: changed_files_limit must be between 1 and {MAX_CHANGED_FILES_LIMIT}, got {}",
            path.display(),
            config.changed_files_limit
        )));
    }

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
