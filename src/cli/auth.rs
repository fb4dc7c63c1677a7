//! Auth command - check that the token can do what a run needs

use crate::cli::style::{Stylize, check};
use anstream::println;
use depmerge::auth::{get_github_auth, test_github_auth};
use depmerge::config::load_config;
use depmerge::error::Result;
use depmerge::platform::GitHubService;
use std::path::Path;

/// Run `auth test`
pub async fn run_auth_test(config_path: Option<&Path>, host: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let host = host.map(String::from).or(config.host);

    let auth = get_github_auth(host.as_deref()).await?;
    println!("{} Found token ({})", check(), auth.source.to_string().muted());

    let service = GitHubService::new(&auth.token, host.as_deref())?;
    let scopes = test_github_auth(&service, &config.required_scopes).await?;

    println!(
        "{} Token has required scopes: {}",
        check(),
        config.required_scopes.join(", ").accent()
    );
    println!("   {}", format!("granted: {}", scopes.join(", ")).muted());
    Ok(())
}
