//! Run command - triage notifications and merge passing dependency updates

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use depmerge::error::{Error, Result};
use depmerge::merge::MergeDecisionEngine;
use depmerge::triage::{ItemReport, Outcome, TriageOptions, TriageReport, run_triage};
use std::path::Path;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Dry run - show what would be done without making changes
    pub dry_run: bool,
}

/// Run the triage command
pub async fn run_triage_command(
    config_path: Option<&Path>,
    host: Option<&str>,
    options: RunOptions,
) -> Result<()> {
    let ctx = CommandContext::new(config_path, host).await?;

    let engine = MergeDecisionEngine::new(ctx.config.decision_config());
    let triage_options = TriageOptions::from_config(&ctx.config, options.dry_run);
    let progress = CliProgress::new(ctx.config.host.clone());

    let report = run_triage(&ctx.platform, &engine, &triage_options, &progress).await?;

    print_summary(&report, options.dry_run);

    if report.has_failures() {
        return Err(Error::Platform(
            "some notifications could not be processed".to_string(),
        ));
    }
    Ok(())
}

/// Print the end-of-run summary
fn print_summary(report: &TriageReport, dry_run: bool) {
    println!();
    if dry_run {
        println!("{}:", "Dry run".emphasis());
    } else {
        println!("{} Triage complete", check());
    }

    let cleared = report
        .security_alerts
        .iter()
        .filter(|item| matches!(item.outcome, Outcome::Cleared | Outcome::WouldClear))
        .count();
    if cleared > 0 {
        let verb = if dry_run { "Would clear" } else { "Cleared" };
        println!("   {verb} {cleared} security alert(s)");
    }

    for item in &report.pull_requests {
        print_item(item);
    }

    let retry: Vec<String> = report
        .retry_later()
        .filter_map(|item| item.pr.as_ref().map(ToString::to_string))
        .collect();
    if !retry.is_empty() {
        println!(
            "   {} {}",
            "Retry next run:".warn(),
            retry.join(", ").accent()
        );
    }

    if dry_run && report.pull_requests.iter().any(|item| {
        matches!(item.outcome, Outcome::WouldMerge { .. })
    }) {
        println!();
        println!("{}", "Run without --dry-run to execute.".muted());
    }
}

fn print_item(item: &ItemReport) {
    let name = item
        .pr
        .as_ref()
        .map_or_else(|| item.title.clone(), ToString::to_string);

    match &item.outcome {
        Outcome::Merged { commit_title } => {
            println!("   {} {}: {}", "Merged".success(), name.accent(), commit_title);
        }
        Outcome::WouldMerge { commit_title } => {
            println!(
                "   {} {}: {}",
                "Would merge".success(),
                name.accent(),
                commit_title
            );
        }
        Outcome::Skipped(reason) => {
            println!("   {} {}: {}", "Skipped".warn(), name.accent(), reason);
        }
        Outcome::Ignored { reason, .. } => {
            println!("   {} {}: {}", "Ignored".muted(), name.muted(), reason.muted());
        }
        Outcome::NotAPullRequest => {
            println!("   {} {}: not a pull request", "Ignored".muted(), name.muted());
        }
        Outcome::Failed(message) => {
            println!("   {} {}: {}", "Failed".error(), name.accent(), message.muted());
        }
        Outcome::RetryLater(_) | Outcome::Cleared | Outcome::WouldClear => {}
    }
}
