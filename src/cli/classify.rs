//! Classify command - show how a title would be handled, offline

use crate::cli::style::Stylize;
use anstream::println;
use depmerge::classify::{
    DependencyScope, NotificationKind, classify, is_lock_file_maintenance,
};
use depmerge::merge::rewrite_commit_title;

/// Run `classify`
pub fn run_classify(title: &str, manifest_changed: bool) {
    let kind = classify(title);
    println!("{} {}", "kind:".emphasis(), kind.to_string().accent());

    if kind != NotificationKind::DependencyUpdate {
        return;
    }

    let scope = DependencyScope::from_title(title);
    let scope_name = match scope {
        DependencyScope::Development => "development",
        DependencyScope::Production => "production",
    };
    println!("{} {}", "scope:".emphasis(), scope_name);

    let commit_title = rewrite_commit_title(
        title,
        scope,
        manifest_changed,
        is_lock_file_maintenance(title),
    );
    println!("{} {}", "commit title:".emphasis(), commit_title);
}
