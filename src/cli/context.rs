//! Shared command context for CLI commands
//!
//! Extracts the setup shared by commands that talk to GitHub.

use depmerge::auth::{get_github_auth, test_github_auth};
use depmerge::config::{Config, load_config};
use depmerge::error::Result;
use depmerge::platform::GitHubService;
use std::path::Path;
use tracing::debug;

/// Shared context for CLI commands that interact with GitHub
///
/// Setup order matters: config first (it names the host and required
/// scopes), then the token, then the service, then scope verification.
/// Any failure here is fatal for the run.
pub struct CommandContext {
    /// Effective configuration
    pub config: Config,
    /// GitHub service
    pub platform: GitHubService,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// `host` overrides the host from the config file.
    pub async fn new(config_path: Option<&Path>, host: Option<&str>) -> Result<Self> {
        let mut config = load_config(config_path)?;
        if let Some(h) = host {
            config.host = Some(h.to_string());
        }

        let auth = get_github_auth(config.host.as_deref()).await?;
        debug!(source = %auth.source, "resolved GitHub token");

        let platform = GitHubService::new(&auth.token, config.host.as_deref())?;

        if config.verify_scopes {
            test_github_auth(&platform, &config.required_scopes).await?;
        }

        Ok(Self { config, platform })
    }
}
