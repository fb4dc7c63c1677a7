//! Notification triage - the orchestrator
//!
//! Loads the inbox, clears security alerts, and walks dependency update
//! PRs one at a time: fetch a snapshot, decide, act, mark read.
//!
//! A notification is only marked read after its action succeeded, so a
//! run that dies halfway leaves the rest unread for the next run.

mod progress;
mod report;

pub use progress::{NoopProgress, ProgressCallback};
pub use report::{ItemReport, Outcome, TriageReport};

use crate::classify::{NotificationKind, classify, parse_pull_request_url};
use crate::config::Config;
use crate::error::Result;
use crate::merge::{MergeDecision, MergeDecisionEngine, execute_merge};
use crate::platform::PlatformService;
use crate::types::{MergeMethod, Notification, PullRequestRef};
use tracing::{debug, info, warn};

/// Options for a triage run
#[derive(Debug, Clone)]
pub struct TriageOptions {
    /// Decide and report, but don't approve, merge, or mark anything read
    pub dry_run: bool,
    /// How to merge PRs
    pub merge_method: MergeMethod,
    /// How many changed files to fetch per PR
    pub changed_files_limit: u32,
}

impl Default for TriageOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            merge_method: MergeMethod::Squash,
            changed_files_limit: 2,
        }
    }
}

impl TriageOptions {
    /// Options from configuration
    pub const fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            dry_run,
            merge_method: config.merge_method,
            changed_files_limit: config.changed_files_limit,
        }
    }
}

/// Run one triage pass over the notification inbox
///
/// Per-notification errors are recorded in the report and the run moves
/// on. Fatal errors (authentication, missing scopes) abort immediately.
pub async fn run_triage(
    platform: &dyn PlatformService,
    engine: &MergeDecisionEngine,
    options: &TriageOptions,
    progress: &dyn ProgressCallback,
) -> Result<TriageReport> {
    progress.on_loading().await;
    let notifications = platform.list_notifications().await?;

    let mut report = TriageReport {
        notifications_found: notifications.len(),
        ..TriageReport::default()
    };

    let mut dependency_updates = Vec::new();
    let mut security_alerts = Vec::new();
    for notification in notifications {
        match classify(&notification.subject_title) {
            NotificationKind::DependencyUpdate => dependency_updates.push(notification),
            NotificationKind::SecurityAlert => security_alerts.push(notification),
            NotificationKind::Unrelated => report.unrelated += 1,
        }
    }

    info!(
        total = report.notifications_found,
        dependency_updates = dependency_updates.len(),
        security_alerts = security_alerts.len(),
        "classified notifications"
    );
    progress
        .on_notifications_loaded(
            report.notifications_found,
            dependency_updates.len(),
            security_alerts.len(),
        )
        .await;

    for alert in security_alerts {
        let outcome = if options.dry_run {
            Outcome::WouldClear
        } else {
            progress
                .on_message(&format!(
                    "Marking \"{}\" notification as read",
                    alert.subject_title
                ))
                .await;
            match platform.mark_notification_read(&alert.thread_id).await {
                Ok(()) => Outcome::Cleared,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(thread_id = %alert.thread_id, error = %e, "failed to clear alert");
                    progress.on_error(None, &e).await;
                    Outcome::Failed(e.to_string())
                }
            }
        };
        report.security_alerts.push(ItemReport {
            thread_id: alert.thread_id,
            title: alert.subject_title,
            pr: None,
            outcome,
        });
    }

    for notification in dependency_updates {
        let Some(pr) = notification
            .subject_url
            .as_deref()
            .and_then(parse_pull_request_url)
        else {
            debug!(
                url = ?notification.subject_url,
                "ignoring, not a pull request URL"
            );
            report.pull_requests.push(ItemReport {
                thread_id: notification.thread_id,
                title: notification.subject_title,
                pr: None,
                outcome: Outcome::NotAPullRequest,
            });
            continue;
        };

        progress.on_checking(&pr).await;
        let outcome =
            match triage_pull_request(platform, engine, options, &notification, &pr, progress)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    progress.on_error(Some(&pr), &e).await;
                    if e.is_retry_later() {
                        info!(%pr, "pull request was meanwhile rebased, try again later");
                        Outcome::RetryLater(e.to_string())
                    } else {
                        warn!(%pr, error = %e, "failed to process pull request");
                        Outcome::Failed(e.to_string())
                    }
                }
            };

        report.pull_requests.push(ItemReport {
            thread_id: notification.thread_id,
            title: notification.subject_title,
            pr: Some(pr),
            outcome,
        });
    }

    Ok(report)
}

/// Decide on and act on a single PR
async fn triage_pull_request(
    platform: &dyn PlatformService,
    engine: &MergeDecisionEngine,
    options: &TriageOptions,
    notification: &Notification,
    pr: &PullRequestRef,
    progress: &dyn ProgressCallback,
) -> Result<Outcome> {
    let snapshot = platform
        .fetch_pull_request(pr, options.changed_files_limit)
        .await?;

    // Reviews are only worth fetching once everything else passed
    let decision = match engine.precheck(&snapshot) {
        Some(decision) => decision,
        None => {
            let reviews = platform.list_reviews(pr).await?;
            engine.decide(&snapshot, &reviews)
        }
    };
    debug!(%pr, %decision, "decided");
    progress.on_decision(pr, &decision).await;

    match decision {
        MergeDecision::Merge {
            commit_title,
            commit_id,
        } => {
            if options.dry_run {
                return Ok(Outcome::WouldMerge { commit_title });
            }
            execute_merge(
                pr,
                &commit_title,
                &commit_id,
                options.merge_method,
                platform,
                progress,
            )
            .await?;
            platform
                .mark_notification_read(&notification.thread_id)
                .await?;
            Ok(Outcome::Merged { commit_title })
        }
        MergeDecision::Skip(reason) => Ok(Outcome::Skipped(reason)),
        MergeDecision::Ignore(reason) => {
            let cleared = reason.clears_notification() && !options.dry_run;
            if cleared {
                platform
                    .mark_notification_read(&notification.thread_id)
                    .await?;
            }
            Ok(Outcome::Ignored { reason, cleared })
        }
    }
}
