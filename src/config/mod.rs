//! User configuration
//!
//! Everything the decision engine and auth layer treat as policy lives
//! here, so it can be changed without a rebuild.

mod storage;

pub use storage::{default_config_path, load_config, load_config_from};

use crate::merge::DecisionConfig;
use crate::types::MergeMethod;
use serde::{Deserialize, Serialize};

/// depmerge configuration, read from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Logins of the dependency bots whose PRs may be merged
    pub trusted_authors: Vec<String>,
    /// Checks that never block a merge
    pub ignored_checks: Vec<String>,
    /// Root-relative manifest paths; changing one marks an out-of-range update
    pub manifest_files: Vec<String>,
    /// OAuth scopes the token must carry
    pub required_scopes: Vec<String>,
    /// Verify token scopes before doing anything
    pub verify_scopes: bool,
    /// How to merge PRs
    pub merge_method: MergeMethod,
    /// How many changed files to inspect for manifest changes
    pub changed_files_limit: u32,
    /// GitHub Enterprise host, unset for github.com
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let decision = DecisionConfig::default();
        let mut trusted_authors: Vec<String> = decision.trusted_authors.into_iter().collect();
        let mut ignored_checks: Vec<String> = decision.ignored_checks.into_iter().collect();
        let mut manifest_files: Vec<String> = decision.manifest_files.into_iter().collect();
        trusted_authors.sort();
        ignored_checks.sort();
        manifest_files.sort();

        Self {
            trusted_authors,
            ignored_checks,
            manifest_files,
            required_scopes: vec!["repo".to_string(), "notifications".to_string()],
            verify_scopes: true,
            merge_method: MergeMethod::Squash,
            changed_files_limit: 2,
            host: None,
        }
    }
}

impl Config {
    /// The subset of configuration the decision engine needs
    pub fn decision_config(&self) -> DecisionConfig {
        DecisionConfig {
            trusted_authors: self.trusted_authors.iter().cloned().collect(),
            ignored_checks: self.ignored_checks.iter().cloned().collect(),
            manifest_files: self.manifest_files.iter().cloned().collect(),
        }
    }
}
