//! Output formatting utilities

use console::style;

use codepush_core::OutputSink;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Sends command output straight to stdout
///
/// Messages are printed unstyled so JSON output stays machine-readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}
