//! CLI command implementations

mod auth;
mod classify;
mod config;
mod context;
mod progress;
mod run;
pub mod style;

pub use auth::run_auth_test;
pub use classify::run_classify;
pub use config::{run_config_path, run_config_show};
pub use progress::CliProgress;
pub use run::{RunOptions, run_triage_command};
