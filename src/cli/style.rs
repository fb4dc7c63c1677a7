//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark glyph
pub const CHECK: &str = "✓";
/// Cross glyph
pub const CROSS: &str = "✗";

/// Semantic colors for CLI output
///
/// Output goes through `anstream`, which strips the escapes when stdout
/// isn't a color terminal.
pub trait Stylize {
    /// Bold
    fn emphasis(&self) -> String;
    /// Dimmed, for secondary detail
    fn muted(&self) -> String;
    /// Cyan, for names and identifiers
    fn accent(&self) -> String;
    /// Green
    fn success(&self) -> String;
    /// Yellow
    fn warn(&self) -> String;
    /// Red
    fn error(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.error()
}

/// Dimmed arrow for list items
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner used while waiting on the API
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Render `text` as a clickable link when the terminal supports it
pub fn hyperlink(text: &str, url: &str) -> String {
    if supports_hyperlinks::supports_hyperlinks() {
        terminal_link::Link::new(text, url).to_string()
    } else {
        url.to_string()
    }
}
