//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use depmerge::error::{Error, Result};
use depmerge::platform::{NotificationService, PullRequestService};
use depmerge::types::{
    MergeMethod, Notification, PullRequestRef, PullRequestSnapshot, ReviewRecord,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `approve_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveCall {
    pub pr_number: u64,
    pub commit_id: String,
}

/// Call record for `merge_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub pr_number: u64,
    pub method: MergeMethod,
    pub commit_title: String,
    pub expected_head_sha: String,
}

/// Error to inject; `Error` itself isn't `Clone`
#[derive(Debug, Clone)]
pub enum InjectedError {
    /// `Error::Platform`
    Platform(String),
    /// `Error::MergeConflict`
    Conflict(String),
    /// `Error::Auth`
    Auth(String),
}

impl InjectedError {
    fn to_error(&self, pr_number: u64) -> Error {
        match self {
            Self::Platform(msg) => Error::Platform(msg.clone()),
            Self::Conflict(msg) => Error::MergeConflict {
                pr_number,
                message: msg.clone(),
            },
            Self::Auth(msg) => Error::Auth(msg.clone()),
        }
    }
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable notifications, snapshots, and reviews (keyed by PR number)
/// - Call tracking for verification
/// - Error injection for failure path testing
#[derive(Default)]
pub struct MockPlatformService {
    notifications: Mutex<Vec<Notification>>,
    snapshots: Mutex<HashMap<u64, PullRequestSnapshot>>,
    reviews: Mutex<HashMap<u64, Vec<ReviewRecord>>>,
    // Call tracking
    fetch_calls: Mutex<Vec<u64>>,
    list_reviews_calls: Mutex<Vec<u64>>,
    approve_calls: Mutex<Vec<ApproveCall>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    mark_read_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_list_notifications: Mutex<Option<InjectedError>>,
    error_on_fetch: Mutex<HashMap<u64, InjectedError>>,
    error_on_merge: Mutex<HashMap<u64, InjectedError>>,
    error_on_mark_read: Mutex<Option<InjectedError>>,
}

impl MockPlatformService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    // === Response setup ===

    /// Set the notifications returned by `list_notifications`
    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        *self.notifications.lock().unwrap() = notifications;
    }

    /// Set the snapshot returned for a PR
    pub fn set_snapshot(&self, snapshot: PullRequestSnapshot) {
        self.snapshots
            .lock()
            .unwrap()
            .insert(snapshot.number, snapshot);
    }

    /// Set the reviews returned for a PR
    pub fn set_reviews(&self, pr_number: u64, reviews: Vec<ReviewRecord>) {
        self.reviews.lock().unwrap().insert(pr_number, reviews);
    }

    // === Error injection methods ===

    /// Make `list_notifications` fail
    pub fn fail_list_notifications(&self, error: InjectedError) {
        *self.error_on_list_notifications.lock().unwrap() = Some(error);
    }

    /// Make `fetch_pull_request` fail for a PR
    pub fn fail_fetch(&self, pr_number: u64, error: InjectedError) {
        self.error_on_fetch.lock().unwrap().insert(pr_number, error);
    }

    /// Make `merge_pull_request` fail for a PR
    pub fn fail_merge(&self, pr_number: u64, error: InjectedError) {
        self.error_on_merge.lock().unwrap().insert(pr_number, error);
    }

    /// Make `mark_notification_read` fail
    pub fn fail_mark_read(&self, error: InjectedError) {
        *self.error_on_mark_read.lock().unwrap() = Some(error);
    }

    // === Call verification methods ===

    /// PR numbers `fetch_pull_request` was called with
    pub fn get_fetch_calls(&self) -> Vec<u64> {
        self.fetch_calls.lock().unwrap().clone()
    }

    /// PR numbers `list_reviews` was called with
    pub fn get_list_reviews_calls(&self) -> Vec<u64> {
        self.list_reviews_calls.lock().unwrap().clone()
    }

    /// All `approve_pull_request` calls
    pub fn get_approve_calls(&self) -> Vec<ApproveCall> {
        self.approve_calls.lock().unwrap().clone()
    }

    /// All `merge_pull_request` calls
    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Thread IDs marked read
    pub fn get_mark_read_calls(&self) -> Vec<String> {
        self.mark_read_calls.lock().unwrap().clone()
    }

    /// Assert that `merge_pull_request` was called for a specific PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pull_request({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pull_request` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            !calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pull_request({pr_number}) NOT to be called but it was: {calls:?}"
        );
    }

    /// Assert that a thread was marked read
    pub fn assert_marked_read(&self, thread_id: &str) {
        let calls = self.get_mark_read_calls();
        assert!(
            calls.iter().any(|c| c == thread_id),
            "Expected thread {thread_id} to be marked read but got: {calls:?}"
        );
    }

    /// Assert that a thread was NOT marked read
    pub fn assert_not_marked_read(&self, thread_id: &str) {
        let calls = self.get_mark_read_calls();
        assert!(
            !calls.iter().any(|c| c == thread_id),
            "Expected thread {thread_id} NOT to be marked read but it was: {calls:?}"
        );
    }

    /// Whether any side effect happened at all
    pub fn has_side_effects(&self) -> bool {
        !self.get_approve_calls().is_empty()
            || !self.get_merge_calls().is_empty()
            || !self.get_mark_read_calls().is_empty()
    }
}

#[async_trait]
impl NotificationService for MockPlatformService {
    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        if let Some(err) = self.error_on_list_notifications.lock().unwrap().as_ref() {
            return Err(err.to_error(0));
        }
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notification_read(&self, thread_id: &str) -> Result<()> {
        self.mark_read_calls
            .lock()
            .unwrap()
            .push(thread_id.to_string());

        if let Some(err) = self.error_on_mark_read.lock().unwrap().as_ref() {
            return Err(err.to_error(0));
        }
        Ok(())
    }
}

#[async_trait]
impl PullRequestService for MockPlatformService {
    async fn fetch_pull_request(
        &self,
        pr: &PullRequestRef,
        _file_limit: u32,
    ) -> Result<PullRequestSnapshot> {
        self.fetch_calls.lock().unwrap().push(pr.number);

        if let Some(err) = self.error_on_fetch.lock().unwrap().get(&pr.number) {
            return Err(err.to_error(pr.number));
        }

        let snapshots = self.snapshots.lock().unwrap();
        snapshots.get(&pr.number).cloned().ok_or_else(|| {
            Error::Platform(format!(
                "fetch_pull_request: no snapshot configured for PR #{}",
                pr.number
            ))
        })
    }

    async fn list_reviews(&self, pr: &PullRequestRef) -> Result<Vec<ReviewRecord>> {
        self.list_reviews_calls.lock().unwrap().push(pr.number);
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews.get(&pr.number).cloned().unwrap_or_default())
    }

    async fn approve_pull_request(&self, pr: &PullRequestRef, commit_id: &str) -> Result<()> {
        self.approve_calls.lock().unwrap().push(ApproveCall {
            pr_number: pr.number,
            commit_id: commit_id.to_string(),
        });
        Ok(())
    }

    async fn merge_pull_request(
        &self,
        pr: &PullRequestRef,
        method: MergeMethod,
        commit_title: &str,
        expected_head_sha: &str,
    ) -> Result<()> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            pr_number: pr.number,
            method,
            commit_title: commit_title.to_string(),
            expected_head_sha: expected_head_sha.to_string(),
        });

        if let Some(err) = self.error_on_merge.lock().unwrap().get(&pr.number) {
            return Err(err.to_error(pr.number));
        }
        Ok(())
    }
}
