//! Notification classification by subject title
//!
//! Dependency bots use fixed title conventions, so a regex over the
//! subject title is enough to tell their PRs apart from everything else
//! in the inbox.

use crate::types::PullRequestRef;
use regex::Regex;
use std::sync::LazyLock;

/// Dependabot: `build(deps): bump foo from 1.0.0 to 1.1.0`
///
/// Capture group 2 is the scope (`deps` or `deps-dev`).
static DEPENDABOT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(chore|build)\((deps(-dev)?)\): bump \S+ from \d+\.\d+\.\d+ to \d+\.\d+\.\d+")
        .expect("valid regex")
});

/// Renovate: `chore(deps): update foo to v2` or `fix(deps): lock file maintenance`
static RENOVATE_UPDATE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(chore|build|fix)\(deps\): (update .* to v\d+(\.\d+\.\d+)?|lock file maintenance)")
        .expect("valid regex")
});

/// Renovate pinned action digest: `ci(action): update actions/checkout digest to abc1234`
static RENOVATE_DIGEST_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ci\(action\): update .* digest to \w{7}").expect("valid regex")
});

static SECURITY_ALERT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Potential security vulnerability found").expect("valid regex")
});

/// API URL of a pull request, with an optional GitHub Enterprise `/api/v3` prefix
static PULL_REQUEST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://[^/]+(?:/api/v3)?/repos/([^/]+)/([^/]+)/pulls/(\d+)$")
        .expect("valid regex")
});

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A dependency update PR opened by a bot
    DependencyUpdate,
    /// A security vulnerability alert
    SecurityAlert,
    /// Anything else; never acted upon
    Unrelated,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DependencyUpdate => write!(f, "dependency update"),
            Self::SecurityAlert => write!(f, "security alert"),
            Self::Unrelated => write!(f, "unrelated"),
        }
    }
}

/// Whether a dependency bump targets dev or production dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyScope {
    /// `deps-dev` scope
    Development,
    /// Everything else
    Production,
}

impl DependencyScope {
    /// Derive the scope from a Dependabot-style title
    ///
    /// Titles that don't follow the Dependabot convention are treated as
    /// production updates.
    pub fn from_title(title: &str) -> Self {
        match DEPENDABOT_TITLE.captures(title) {
            Some(caps) if caps.get(2).is_some_and(|m| m.as_str() == "deps-dev") => {
                Self::Development
            }
            _ => Self::Production,
        }
    }
}

/// Classify a notification by its subject title
pub fn classify(title: &str) -> NotificationKind {
    if is_dependency_update_title(title) {
        NotificationKind::DependencyUpdate
    } else if SECURITY_ALERT_TITLE.is_match(title) {
        NotificationKind::SecurityAlert
    } else {
        NotificationKind::Unrelated
    }
}

/// Whether the title follows one of the known dependency bot conventions
pub fn is_dependency_update_title(title: &str) -> bool {
    DEPENDABOT_TITLE.is_match(title)
        || RENOVATE_UPDATE_TITLE.is_match(title)
        || RENOVATE_DIGEST_TITLE.is_match(title)
}

/// Whether the title matches the Dependabot "bump X from A to B" convention
pub fn is_dependabot_title(title: &str) -> bool {
    DEPENDABOT_TITLE.is_match(title)
}

/// Whether this is a Renovate lock file maintenance PR
pub fn is_lock_file_maintenance(title: &str) -> bool {
    title.contains("lock file maintenance")
}

/// Parse a notification subject URL into a PR reference
///
/// Returns `None` for anything that isn't a pull request API URL
/// (issues, releases, security advisories, ...).
pub fn parse_pull_request_url(url: &str) -> Option<PullRequestRef> {
    let caps = PULL_REQUEST_URL.captures(url)?;
    let number = caps[3].parse().ok()?;
    Some(PullRequestRef {
        owner: caps[1].to_string(),
        repo: caps[2].to_string(),
        number,
    })
}
