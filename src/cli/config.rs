//! Config command - locate and print the effective configuration

use anstream::println;
use depmerge::config::{default_config_path, load_config};
use depmerge::error::{Error, Result};
use std::path::Path;

/// Run `config path`
pub fn run_config_path() -> Result<()> {
    let path = default_config_path()
        .ok_or_else(|| Error::Config("no config directory on this platform".to_string()))?;
    println!("{}", path.display());
    Ok(())
}

/// Run `config show`
pub fn run_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| Error::Internal(format!("failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}
