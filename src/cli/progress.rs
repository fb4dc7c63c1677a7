//! Terminal progress output for triage runs

use crate::cli::style::{Stylize, arrow, check, cross, hyperlink, spinner_style};
use anstream::println;
use async_trait::async_trait;
use depmerge::error::Error;
use depmerge::merge::{MergeDecision, SkipReason};
use depmerge::triage::ProgressCallback;
use depmerge::types::PullRequestRef;
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;

/// Prints triage progress to stdout
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
    host: Option<String>,
}

impl CliProgress {
    /// Create progress output; `host` is used to build PR links
    pub const fn new(host: Option<String>) -> Self {
        Self {
            spinner: Mutex::new(None),
            host,
        }
    }

    fn pr_link(&self, pr: &PullRequestRef) -> String {
        let url = pr.html_url(self.host.as_deref());
        hyperlink(&pr.to_string(), &url)
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_loading(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message("Loading all notifications...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    async fn on_notifications_loaded(
        &self,
        total: usize,
        dependency_updates: usize,
        security_alerts: usize,
    ) {
        let spinner = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        let message = format!("{} {total} notifications found", check());
        match spinner {
            Some(spinner) => spinner.finish_with_message(message),
            None => println!("{message}"),
        }
        println!(
            "  {} dependency update pull requests, {} security vulnerability notifications",
            dependency_updates.to_string().accent(),
            security_alerts.to_string().accent()
        );
    }

    async fn on_checking(&self, pr: &PullRequestRef) {
        println!("{} Checking {}", arrow(), self.pr_link(pr));
    }

    async fn on_decision(&self, _pr: &PullRequestRef, decision: &MergeDecision) {
        match decision {
            MergeDecision::Merge { commit_title, .. } => {
                println!("  {} {}", "Merging as".success(), commit_title.emphasis());
            }
            MergeDecision::Skip(SkipReason::FailingChecks { failing, total }) => {
                println!(
                    "  {} {} checks/statuses out of {total} are not successful:",
                    cross(),
                    failing.len()
                );
                for entry in failing {
                    println!("    - {entry}");
                    if let Some(link) = entry.link() {
                        println!("      {}", link.muted());
                    }
                }
            }
            MergeDecision::Skip(reason) => {
                println!("  {} {}", cross(), reason.to_string().warn());
            }
            MergeDecision::Ignore(reason) => {
                println!("  {}", format!("Ignoring. {reason}").muted());
            }
        }
    }

    async fn on_error(&self, pr: Option<&PullRequestRef>, error: &Error) {
        let subject = pr.map_or_else(String::new, |pr| format!("{pr}: "));
        if error.is_retry_later() {
            println!(
                "  {}",
                format!("{subject}pull request was meanwhile rebased, try again later").warn()
            );
        } else {
            println!("  {} {subject}{}", "error:".error(), error);
        }
    }

    async fn on_message(&self, message: &str) {
        println!("  {}", message.muted());
    }
}
