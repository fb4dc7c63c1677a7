//! Platform services for GitHub
//!
//! The orchestrator only talks to these traits, so tests can swap in a
//! recording mock and the decision logic never sees HTTP.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{MergeMethod, Notification, PullRequestRef, PullRequestSnapshot, ReviewRecord};
use async_trait::async_trait;

/// Access to the notification inbox
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// List all unread notifications, following pagination
    async fn list_notifications(&self) -> Result<Vec<Notification>>;

    /// Mark a notification thread as read
    async fn mark_notification_read(&self, thread_id: &str) -> Result<()>;
}

/// Pull request queries and actions
#[async_trait]
pub trait PullRequestService: Send + Sync {
    /// Fetch a fresh snapshot of a PR
    ///
    /// `file_limit` bounds how many changed file paths are returned.
    async fn fetch_pull_request(
        &self,
        pr: &PullRequestRef,
        file_limit: u32,
    ) -> Result<PullRequestSnapshot>;

    /// List reviews on a PR, in submission order
    async fn list_reviews(&self, pr: &PullRequestRef) -> Result<Vec<ReviewRecord>>;

    /// Approve a PR at the given commit
    async fn approve_pull_request(&self, pr: &PullRequestRef, commit_id: &str) -> Result<()>;

    /// Merge a PR
    ///
    /// Fails with [`Error::MergeConflict`] when the head moved past
    /// `expected_head_sha` or the PR is currently not mergeable.
    ///
    /// [`Error::MergeConflict`]: crate::error::Error::MergeConflict
    async fn merge_pull_request(
        &self,
        pr: &PullRequestRef,
        method: MergeMethod,
        commit_title: &str,
        expected_head_sha: &str,
    ) -> Result<()>;
}

/// Everything the orchestrator needs from the platform
pub trait PlatformService: NotificationService + PullRequestService {}

impl<T: NotificationService + PullRequestService> PlatformService for T {}
