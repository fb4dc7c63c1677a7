//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{ApproveCall, InjectedError, MergeCall, MockPlatformService};

use chrono::{TimeZone, Utc};
use depmerge::types::{
    CheckConclusion, CheckRun, CheckSuite, CommitStatus, LastCommit, Notification, PrState,
    PullRequestRef, PullRequestSnapshot, ReviewRecord, ReviewState, StatusContext, StatusState,
};

/// Head sha used by every fixture snapshot
pub const HEAD_SHA: &str = "0123456789abcdef0123456789abcdef01234567";

/// Reference to a PR in the fixture repository
pub fn test_ref(number: u64) -> PullRequestRef {
    PullRequestRef {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        number,
    }
}

/// Notification with an arbitrary subject URL
pub fn make_notification(thread_id: &str, title: &str, url: Option<&str>) -> Notification {
    Notification {
        thread_id: thread_id.to_string(),
        subject_title: title.to_string(),
        subject_url: url.map(String::from),
        subject_type: "PullRequest".to_string(),
        repository: "test/repo".to_string(),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Notification pointing at a PR in the fixture repository
pub fn pr_notification(thread_id: &str, title: &str, number: u64) -> Notification {
    make_notification(
        thread_id,
        title,
        Some(&format!(
            "https://api.github.com/repos/test/repo/pulls/{number}"
        )),
    )
}

/// Check run with a permalink derived from its name
pub fn check_run(name: &str, conclusion: Option<CheckConclusion>) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        conclusion,
        permalink: format!("https://github.com/test/repo/runs/{name}"),
    }
}

/// Legacy status context
pub fn status_context(context: &str, state: StatusState) -> StatusContext {
    StatusContext {
        context: context.to_string(),
        state,
        target_url: Some(format!("https://ci.example.com/{context}")),
    }
}

/// Review record
pub fn review(login: &str, state: ReviewState) -> ReviewRecord {
    ReviewRecord {
        reviewer_login: login.to_string(),
        state,
    }
}

/// Open PR by `author` with one passing check and no legacy status
pub fn make_snapshot(number: u64, title: &str, author: &str) -> PullRequestSnapshot {
    PullRequestSnapshot {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        state: PrState::Open,
        author_login: Some(author.to_string()),
        changed_file_paths: vec!["package-lock.json".to_string()],
        last_commit: LastCommit {
            id: HEAD_SHA.to_string(),
            check_suites: vec![CheckSuite {
                check_runs: vec![check_run("test", Some(CheckConclusion::Success))],
            }],
            status: None,
        },
    }
}

/// Builder-style tweaks for fixture snapshots
pub trait SnapshotExt {
    fn with_state(self, state: PrState) -> Self;
    fn with_files(self, files: &[&str]) -> Self;
    fn with_check_suites(self, suites: Vec<Vec<CheckRun>>) -> Self;
    fn with_statuses(self, contexts: Vec<StatusContext>) -> Self;
}

impl SnapshotExt for PullRequestSnapshot {
    fn with_state(mut self, state: PrState) -> Self {
        self.state = state;
        self
    }

    fn with_files(mut self, files: &[&str]) -> Self {
        self.changed_file_paths = files.iter().map(|f| (*f).to_string()).collect();
        self
    }

    fn with_check_suites(mut self, suites: Vec<Vec<CheckRun>>) -> Self {
        self.last_commit.check_suites = suites
            .into_iter()
            .map(|check_runs| CheckSuite { check_runs })
            .collect();
        self
    }

    fn with_statuses(mut self, contexts: Vec<StatusContext>) -> Self {
        self.last_commit.status = Some(CommitStatus { contexts });
        self
    }
}
