//! Core types for depmerge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification thread from the GitHub inbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Thread ID (used to mark the notification read)
    pub thread_id: String,
    /// Title of the referenced subject (PR title, alert title, ...)
    pub subject_title: String,
    /// API URL of the referenced resource, if any
    pub subject_url: Option<String>,
    /// Subject type as reported by GitHub ("PullRequest", "Issue", ...)
    pub subject_type: String,
    /// Full name of the repository (`owner/repo`)
    pub repository: String,
    /// When the thread was last updated
    pub updated_at: DateTime<Utc>,
}

/// Identifies a pull request on the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub number: u64,
}

impl PullRequestRef {
    /// Web URL of the PR on github.com (or the given enterprise host)
    pub fn html_url(&self, host: Option<&str>) -> String {
        format!(
            "https://{}/{}/{}/pull/{}",
            host.unwrap_or("github.com"),
            self.owner,
            self.repo,
            self.number
        )
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    /// PR is open and can be merged
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckConclusion {
    /// Check wants manual action
    ActionRequired,
    /// Check was cancelled
    Cancelled,
    /// Check failed
    Failure,
    /// Check finished without a verdict; counts as passing
    Neutral,
    /// Check was skipped
    Skipped,
    /// Check went stale before completing
    Stale,
    /// Check could not start
    StartupFailure,
    /// Check passed
    Success,
    /// Check ran out of time
    TimedOut,
    /// Conclusion added by GitHub after this was written
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ActionRequired => "ACTION_REQUIRED",
            Self::Cancelled => "CANCELLED",
            Self::Failure => "FAILURE",
            Self::Neutral => "NEUTRAL",
            Self::Skipped => "SKIPPED",
            Self::Stale => "STALE",
            Self::StartupFailure => "STARTUP_FAILURE",
            Self::Success => "SUCCESS",
            Self::TimedOut => "TIMED_OUT",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A single check run on a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name
    pub name: String,
    /// Conclusion, `None` while the check is still running
    pub conclusion: Option<CheckConclusion>,
    /// Link to the check run
    pub permalink: String,
}

/// A check suite groups the check runs created by one app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSuite {
    /// Check runs in this suite
    pub check_runs: Vec<CheckRun>,
}

/// State of a legacy commit status context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusState {
    /// Status reported an error
    Error,
    /// Required status that hasn't reported yet
    Expected,
    /// Status failed
    Failure,
    /// Status is still running
    Pending,
    /// Status passed
    Success,
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Error => "ERROR",
            Self::Expected => "EXPECTED",
            Self::Failure => "FAILURE",
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
        };
        f.write_str(s)
    }
}

/// A legacy commit status context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusContext {
    /// Context name (e.g. "continuous-integration/travis-ci")
    pub context: String,
    /// Reported state
    pub state: StatusState,
    /// Link to the external CI result
    pub target_url: Option<String>,
}

/// Combined legacy status of a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    /// Individual status contexts
    pub contexts: Vec<StatusContext>,
}

/// The head commit of a PR together with its CI results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastCommit {
    /// Commit sha
    pub id: String,
    /// Check suites attached to the commit
    pub check_suites: Vec<CheckSuite>,
    /// Legacy status, `None` when no status was ever reported
    pub status: Option<CommitStatus>,
}

/// Everything needed to decide whether a PR can be merged
///
/// Fetched fresh for every decision and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSnapshot {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Current state of the PR
    pub state: PrState,
    /// Author login, `None` for deleted accounts
    pub author_login: Option<String>,
    /// Paths of the first few changed files
    pub changed_file_paths: Vec<String>,
    /// Head commit
    pub last_commit: LastCommit,
}

impl PullRequestSnapshot {
    /// Reference to this PR
    pub fn pr_ref(&self) -> PullRequestRef {
        PullRequestRef {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            number: self.number,
        }
    }
}

/// Review state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Comment without a verdict
    Commented,
    /// Review was dismissed
    Dismissed,
    /// Review not submitted yet
    Pending,
    /// Any state not listed above
    #[serde(other)]
    Other,
}

/// A review left on a PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Login of the reviewer
    pub reviewer_login: String,
    /// Review state
    pub state: ReviewState,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Squash all commits into one
    #[default]
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
