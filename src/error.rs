//! Error types for depmerge

use thiserror::Error;

/// Errors that can occur while triaging notifications
#[derive(Error, Debug)]
pub enum Error {
    /// No usable token, or the token was rejected
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Token is valid but lacks a required OAuth scope
    #[error("provided token does not include the \"{0}\" scope")]
    MissingScope(String),

    /// Configuration file could not be read or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// GitHub API returned something we could not use
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error (used by test doubles and wrappers)
    #[error("platform error: {0}")]
    Platform(String),

    /// Merge was refused because the PR changed since it was inspected
    ///
    /// GitHub answers 405 when the PR is not mergeable (usually a rebase
    /// is in flight) and 409 when the head moved past the expected sha.
    #[error("PR #{pr_number} was modified while being merged: {message}")]
    MergeConflict {
        /// PR number
        pr_number: u64,
        /// Message returned by the platform
        message: String,
    },

    /// Octocrab request failed
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Raw HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error must abort the whole run
    ///
    /// Everything else is reported against the notification being
    /// processed and the run moves on to the next one.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::MissingScope(_) | Self::Config(_))
    }

    /// Whether the item should simply be retried on the next run
    pub const fn is_retry_later(&self) -> bool {
        matches!(self, Self::MergeConflict { .. })
    }
}

/// Result type alias for depmerge operations
pub type Result<T> = std::result::Result<T, Error>;
