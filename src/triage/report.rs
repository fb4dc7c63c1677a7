//! Results of a triage run

use crate::merge::{IgnoreReason, SkipReason};
use crate::types::PullRequestRef;

/// What happened to one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Approved, merged, and marked read
    Merged {
        /// Title of the squash commit
        commit_title: String,
    },
    /// Dry run: would have been merged
    WouldMerge {
        /// Title the squash commit would get
        commit_title: String,
    },
    /// Left unread, to be re-evaluated next run
    Skipped(SkipReason),
    /// Out of scope for automatic merging
    Ignored {
        /// Why
        reason: IgnoreReason,
        /// Whether the notification was marked read
        cleared: bool,
    },
    /// Subject URL doesn't point at a pull request
    NotAPullRequest,
    /// Security alert marked read
    Cleared,
    /// Dry run: security alert would have been marked read
    WouldClear,
    /// PR changed under us; it'll be retried next run
    RetryLater(String),
    /// Platform error while handling this notification
    Failed(String),
}

/// Report for a single notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Notification thread ID
    pub thread_id: String,
    /// Subject title
    pub title: String,
    /// The PR, if the subject is one
    pub pr: Option<PullRequestRef>,
    /// What happened
    pub outcome: Outcome,
}

/// Result of a triage run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageReport {
    /// Notifications in the inbox
    pub notifications_found: usize,
    /// Notifications that were neither alerts nor dependency updates
    pub unrelated: usize,
    /// Security vulnerability alerts
    pub security_alerts: Vec<ItemReport>,
    /// Dependency update PRs, in processing order
    pub pull_requests: Vec<ItemReport>,
}

impl TriageReport {
    /// Number of PRs merged
    pub fn merged_count(&self) -> usize {
        self.pull_requests
            .iter()
            .filter(|item| matches!(item.outcome, Outcome::Merged { .. }))
            .count()
    }

    /// Whether any notification failed with a platform error
    pub fn has_failures(&self) -> bool {
        self.security_alerts
            .iter()
            .chain(&self.pull_requests)
            .any(|item| matches!(item.outcome, Outcome::Failed(_)))
    }

    /// Items that should be retried on the next run
    pub fn retry_later(&self) -> impl Iterator<Item = &ItemReport> {
        self.pull_requests
            .iter()
            .filter(|item| matches!(item.outcome, Outcome::RetryLater(_)))
    }
}
