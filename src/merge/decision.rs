//! Merge decisions - pure functions over a PR snapshot
//!
//! No I/O happens here. The orchestrator fetches the snapshot and reviews,
//! hands them in, and acts on the returned `MergeDecision`.

use crate::classify::{DependencyScope, is_lock_file_maintenance};
use crate::merge::commit_title::rewrite_commit_title;
use crate::types::{
    CheckConclusion, CheckRun, PrState, PullRequestSnapshot, ReviewRecord, ReviewState,
    StatusContext, StatusState,
};
use std::collections::HashSet;

/// Inputs to the decision that come from configuration rather than the PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionConfig {
    /// Logins of the bots whose PRs may be merged automatically
    pub trusted_authors: HashSet<String>,
    /// Check names that never block a merge (flaky or reporting-only)
    pub ignored_checks: HashSet<String>,
    /// Root-relative paths whose change marks an out-of-range update
    pub manifest_files: HashSet<String>,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            trusted_authors: ["dependabot", "renovate"].map(String::from).into(),
            ignored_checks: ["Pika CI", "project-board"].map(String::from).into(),
            manifest_files: ["package.json"].map(String::from).into(),
        }
    }
}

/// A check run or status context that is holding up the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailingCheck {
    /// Check run with a non-passing conclusion
    CheckRun {
        /// Check name
        name: String,
        /// Conclusion reported by the check
        conclusion: CheckConclusion,
        /// Link to the run
        permalink: String,
    },
    /// Legacy status context that is not successful
    Status {
        /// Context name
        context: String,
        /// Reported state
        state: StatusState,
        /// Link to the external result
        target_url: Option<String>,
    },
}

impl FailingCheck {
    /// Name of the check or status context
    pub fn name(&self) -> &str {
        match self {
            Self::CheckRun { name, .. } => name,
            Self::Status { context, .. } => context,
        }
    }

    /// Link to the failing result, if there is one
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::CheckRun { permalink, .. } => Some(permalink),
            Self::Status { target_url, .. } => target_url.as_deref(),
        }
    }
}

impl std::fmt::Display for FailingCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CheckRun {
                name, conclusion, ..
            } => write!(f, "check run \"{name}\": {conclusion}"),
            Self::Status { context, state, .. } => write!(f, "status \"{context}\": {state}"),
        }
    }
}

/// Why an eligible PR was not merged this time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Some checks or statuses are not successful
    FailingChecks {
        /// The failing entries, check runs first
        failing: Vec<FailingCheck>,
        /// Total number of check runs and status contexts
        total: usize,
    },
    /// A reviewer requested changes
    ChangesRequested {
        /// Logins of the reviewers, in review order
        reviewers: Vec<String>,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailingChecks { failing, total } => {
                write!(f, "{} of {total} checks/statuses failing", failing.len())
            }
            Self::ChangesRequested { reviewers } => {
                let logins: Vec<String> = reviewers.iter().map(|r| format!("@{r}")).collect();
                write!(f, "changes requested by: {}", logins.join(", "))
            }
        }
    }
}

/// Why a PR is out of scope for automatic merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Author is not a trusted dependency bot
    UnknownAuthor(Option<String>),
    /// PR was already closed or merged
    NotOpen(PrState),
}

impl IgnoreReason {
    /// Whether the notification should still be marked read
    ///
    /// A closed or merged PR needs no further attention. A PR from an
    /// unknown author is left for a human.
    pub const fn clears_notification(&self) -> bool {
        matches!(self, Self::NotOpen(_))
    }
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAuthor(Some(login)) => {
                write!(f, "author \"{login}\" is not a known dependency update app")
            }
            Self::UnknownAuthor(None) => {
                write!(f, "author is unknown, not a known dependency update app")
            }
            Self::NotOpen(state) => write!(f, "pull request is {state}"),
        }
    }
}

/// Outcome of evaluating a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// Approve and squash-merge at `commit_id` with `commit_title`
    Merge {
        /// Squash commit title
        commit_title: String,
        /// Head commit the approval and merge are pinned to
        commit_id: String,
    },
    /// Leave it for now, it may become mergeable later
    Skip(SkipReason),
    /// Not ours to merge
    Ignore(IgnoreReason),
}

impl std::fmt::Display for MergeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge { commit_title, .. } => write!(f, "merge as \"{commit_title}\""),
            Self::Skip(reason) => write!(f, "skip: {reason}"),
            Self::Ignore(reason) => write!(f, "ignore: {reason}"),
        }
    }
}

/// Decides whether dependency update PRs can be merged
#[derive(Debug, Clone, Default)]
pub struct MergeDecisionEngine {
    config: DecisionConfig,
}

impl MergeDecisionEngine {
    /// Create an engine with the given configuration
    pub const fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine decides with
    pub const fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Run every rule that doesn't need reviews
    ///
    /// Returns `Some` when the outcome is already known (ignored, or
    /// blocked by CI), so the caller can avoid fetching reviews.
    pub fn precheck(&self, pr: &PullRequestSnapshot) -> Option<MergeDecision> {
        let trusted = pr
            .author_login
            .as_ref()
            .is_some_and(|login| self.config.trusted_authors.contains(login));
        if !trusted {
            return Some(MergeDecision::Ignore(IgnoreReason::UnknownAuthor(
                pr.author_login.clone(),
            )));
        }

        if pr.state != PrState::Open {
            return Some(MergeDecision::Ignore(IgnoreReason::NotOpen(pr.state)));
        }

        let check_runs: Vec<&CheckRun> = pr
            .last_commit
            .check_suites
            .iter()
            .flat_map(|suite| &suite.check_runs)
            .collect();
        let statuses: &[StatusContext] = pr
            .last_commit
            .status
            .as_ref()
            .map(|status| status.contexts.as_slice())
            .unwrap_or_default();

        let mut failing: Vec<FailingCheck> = check_runs
            .iter()
            .filter(|run| !self.config.ignored_checks.contains(&run.name))
            .filter_map(|run| match run.conclusion {
                // `None` is a check that is still running, not a failure
                None | Some(CheckConclusion::Success | CheckConclusion::Neutral) => None,
                Some(conclusion) => Some(FailingCheck::CheckRun {
                    name: run.name.clone(),
                    conclusion,
                    permalink: run.permalink.clone(),
                }),
            })
            .collect();
        failing.extend(
            statuses
                .iter()
                .filter(|status| status.state != StatusState::Success)
                .map(|status| FailingCheck::Status {
                    context: status.context.clone(),
                    state: status.state,
                    target_url: status.target_url.clone(),
                }),
        );

        if failing.is_empty() {
            None
        } else {
            Some(MergeDecision::Skip(SkipReason::FailingChecks {
                failing,
                total: check_runs.len() + statuses.len(),
            }))
        }
    }

    /// Decide what to do with a PR
    ///
    /// Every `CHANGES_REQUESTED` review blocks, even when the same reviewer
    /// approved afterwards.
    pub fn decide(&self, pr: &PullRequestSnapshot, reviews: &[ReviewRecord]) -> MergeDecision {
        if let Some(decision) = self.precheck(pr) {
            return decision;
        }

        let reviewers: Vec<String> = reviews
            .iter()
            .filter(|review| review.state == ReviewState::ChangesRequested)
            .map(|review| review.reviewer_login.clone())
            .collect();
        if !reviewers.is_empty() {
            return MergeDecision::Skip(SkipReason::ChangesRequested { reviewers });
        }

        MergeDecision::Merge {
            commit_title: self.commit_title(pr),
            commit_id: pr.last_commit.id.clone(),
        }
    }

    /// Squash commit title for the PR
    pub fn commit_title(&self, pr: &PullRequestSnapshot) -> String {
        rewrite_commit_title(
            &pr.title,
            DependencyScope::from_title(&pr.title),
            self.manifest_changed(pr),
            is_lock_file_maintenance(&pr.title),
        )
    }

    /// Whether any changed file is a dependency manifest
    ///
    /// Paths are repository-root relative; `package.json` only matches the
    /// root manifest.
    pub fn manifest_changed(&self, pr: &PullRequestSnapshot) -> bool {
        pr.changed_file_paths
            .iter()
            .any(|path| self.config.manifest_files.contains(path))
    }
}
