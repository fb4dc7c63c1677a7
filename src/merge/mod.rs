//! Merge engine for dependency update PRs
//!
//! Same split as the rest of the crate:
//! 1. Decide - `MergeDecisionEngine` (pure, testable)
//! 2. Execute - approve and merge (effectful)

mod commit_title;
mod decision;
mod execute;

pub use commit_title::rewrite_commit_title;
pub use decision::{
    DecisionConfig, FailingCheck, IgnoreReason, MergeDecision, MergeDecisionEngine, SkipReason,
};
pub use execute::execute_merge;
