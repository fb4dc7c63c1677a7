//! Merge execution - effectful operations
//!
//! Takes a `Merge` decision (created by the pure engine) and carries it
//! out via the platform API.

use crate::error::Result;
use crate::platform::PullRequestService;
use crate::triage::ProgressCallback;
use crate::types::{MergeMethod, PullRequestRef};
use tracing::info;

/// Approve and merge a PR (EFFECTFUL)
///
/// Both the approval and the merge are pinned to `commit_id`, the head the
/// decision was made on. If the bot pushed in between, the merge fails
/// with `Error::MergeConflict` and the PR is picked up again next run.
pub async fn execute_merge<P>(
    pr: &PullRequestRef,
    commit_title: &str,
    commit_id: &str,
    method: MergeMethod,
    platform: &P,
    progress: &dyn ProgressCallback,
) -> Result<()>
where
    P: PullRequestService + ?Sized,
{
    progress.on_message("adding review").await;
    platform.approve_pull_request(pr, commit_id).await?;

    progress.on_message("merging ...").await;
    platform
        .merge_pull_request(pr, method, commit_title, commit_id)
        .await?;

    info!(%pr, commit_title, "merged");
    Ok(())
}
