//! depmerge - merge dependency update PRs straight from your GitHub inbox
//!
//! Walks your notifications, picks out PRs opened by dependency bots
//! (Dependabot, Renovate), and approves and squash-merges the ones whose
//! checks pass and that no reviewer objected to. Security alert
//! notifications are marked read along the way.
//!
//! The decision logic in [`classify`] and [`merge`] is pure; all I/O goes
//! through the traits in [`platform`].

pub mod auth;
pub mod classify;
pub mod config;
pub mod error;
pub mod merge;
pub mod platform;
pub mod triage;
pub mod types;
