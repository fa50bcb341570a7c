//! CLI presenter for output formatting

use std::io::{self, Write};

use chrono::{DateTime, Local};
use colored::*;

use crate::domain::history::HistoryItem;
use crate::domain::search::calendar;

/// Longest text preview shown per item, in characters
const PREVIEW_CHARS: usize = 72;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Print one history row: index, relative copy time, preview
    pub fn history_entry(&self, index: usize, item: &HistoryItem, now: &DateTime<Local>) {
        println!(
            "{:>4}  {}  {}",
            index.to_string().cyan(),
            calendar(&item.copied_at(), now).dimmed(),
            format_preview(item)
        );
    }

    /// Shown when there is no history at all
    pub fn empty_history(&self) {
        self.info("Clipboard history is empty. Run 'clip-history watch' and copy something.");
    }

    /// Shown when history exists but nothing matches the search
    pub fn no_results(&self) {
        self.output("No results");
    }

    /// Shown when every item type is switched off
    pub fn all_kinds_filtered(&self) {
        self.info("Nothing to show: both text and images are filtered out.");
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line preview of an item
pub fn format_preview(item: &HistoryItem) -> String {
    match item {
        HistoryItem::Text { value, .. } => {
            let line = value.trim().lines().next().unwrap_or_default();
            let mut preview: String = line.chars().take(PREVIEW_CHARS).collect();
            let more_lines = value.trim().lines().nth(1).is_some();
            if preview.chars().count() < line.chars().count() || more_lines {
                preview.push('…');
            }
            preview
        }
        HistoryItem::Image { value, .. } => format!(
            "[image {}x{}, {}]",
            value.width,
            value.height,
            value.human_readable_size()
        ),
    }
}
