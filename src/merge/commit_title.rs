//! Squash commit title rewriting
//!
//! The commit prefix drives semantic-release: `fix` cuts a patch release,
//! `build` does not. Only bumps that touch a dependency manifest (an
//! out-of-range update that users of the package will see) become `fix`.

use crate::classify::{DependencyScope, is_dependabot_title};

const BUILD_PREFIX: &str = "build(deps)";
const FIX_PREFIX: &str = "fix(deps)";

/// Derive the squash commit title from the original PR title
pub fn rewrite_commit_title(
    original_title: &str,
    scope: DependencyScope,
    manifest_changed: bool,
    is_lock_file_maintenance: bool,
) -> String {
    // Renovate opens lock file maintenance as `fix(deps)`, which would
    // trigger a release for a lockfile-only change.
    if is_lock_file_maintenance {
        return replace_prefix(original_title, FIX_PREFIX, BUILD_PREFIX);
    }

    if !is_dependabot_title(original_title) {
        return original_title.to_string();
    }

    if scope == DependencyScope::Development {
        return original_title.to_string();
    }

    if manifest_changed {
        return replace_prefix(original_title, BUILD_PREFIX, FIX_PREFIX);
    }

    original_title.to_string()
}

fn replace_prefix(title: &str, from: &str, to: &str) -> String {
    title
        .strip_prefix(from)
        .map_or_else(|| title.to_string(), |rest| format!("{to}{rest}"))
}
