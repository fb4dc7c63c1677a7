//! GitHub token discovery and scope verification

use super::AuthSource;
use crate::error::{Error, Result};
use crate::platform::GitHubService;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// Enterprise host, `None` for github.com
    pub host: Option<String>,
}

/// Find a GitHub token
///
/// Checks `GITHUB_TOKEN`, then `GH_TOKEN`, then falls back to
/// `gh auth token`.
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            debug!(var, "using token from environment");
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
                host: host.map(String::from),
            });
        }
    }

    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(h) = host {
        cmd.args(["--hostname", h]);
    }

    let output = cmd.output().await.map_err(|e| {
        Error::Auth(format!(
            "GITHUB_TOKEN environment variable not set and gh CLI unavailable: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(Error::Auth(
            "GITHUB_TOKEN environment variable not set and gh CLI is not logged in".to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("gh auth token returned an empty token".to_string()));
    }

    debug!("using token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
        host: host.map(String::from),
    })
}

/// Check that every required scope was granted
pub fn verify_scopes(granted: &[String], required: &[String]) -> Result<()> {
    for scope in required {
        if !granted.iter().any(|g| g == scope) {
            return Err(Error::MissingScope(scope.clone()));
        }
    }
    Ok(())
}

/// Probe the API with the token and verify its scopes
///
/// Returns the granted scopes. Tokens that don't report scopes
/// (fine-grained tokens) are rejected, since we can't tell whether they
/// may merge and manage notifications.
pub async fn test_github_auth(service: &GitHubService, required: &[String]) -> Result<Vec<String>> {
    let scopes = service.token_scopes().await?.ok_or_else(|| {
        Error::Auth(
            "token does not report OAuth scopes; set verify_scopes = false to skip this check"
                .to_string(),
        )
    })?;
    verify_scopes(&scopes, required)?;
    Ok(scopes)
}
