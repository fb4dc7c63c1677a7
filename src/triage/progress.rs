//! Progress reporting hooks for a triage run

use crate::error::Error;
use crate::merge::MergeDecision;
use crate::types::PullRequestRef;
use async_trait::async_trait;

/// Callback for progress updates during a triage run
///
/// All methods have no-op defaults so implementors only override what
/// they display.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Notifications are about to be loaded
    async fn on_loading(&self) {}

    /// Notifications were loaded and classified
    async fn on_notifications_loaded(
        &self,
        _total: usize,
        _dependency_updates: usize,
        _security_alerts: usize,
    ) {
    }

    /// A PR is about to be inspected
    async fn on_checking(&self, _pr: &PullRequestRef) {}

    /// The engine reached a decision for a PR
    async fn on_decision(&self, _pr: &PullRequestRef, _decision: &MergeDecision) {}

    /// Processing a notification failed; the run continues
    async fn on_error(&self, _pr: Option<&PullRequestRef>, _error: &Error) {}

    /// Free-form status message
    async fn on_message(&self, _message: &str) {}
}

/// Progress callback that ignores everything
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {}
