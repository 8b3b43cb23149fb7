//! Status lines for CLI mode
//!
//! Progress and result lines are styled with `console`; colors are dropped
//! automatically when stdout is not a terminal or `--no-color` is given.

use console::style;

/// Kind of status line, selects the icon and color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Progress,
    Pass,
    Fail,
    Warning,
}

/// Format a status line with a colored icon
pub fn format_status(kind: StatusKind, message: &str) -> String {
    match kind {
        StatusKind::Progress => format!("{} {}", style("→").cyan(), message),
        StatusKind::Pass => format!("  {} {}", style("✓").green(), message),
        StatusKind::Fail => format!("  {} {}", style("✗").red(), message),
        StatusKind::Warning => format!("  {} {}", style("⚠").yellow(), message),
    }
}

/// Print a progress line
pub fn print_progress(message: &str) {
    println!("{}", format_status(StatusKind::Progress, message));
}

/// Print a pass status
pub fn print_pass(message: &str) {
    println!("{}", format_status(StatusKind::Pass, message));
}

/// Print a fail status
pub fn print_fail(message: &str) {
    println!("{}", format_status(StatusKind::Fail, message));
}

/// Print a warning status
pub fn print_warning(message: &str) {
    println!("{}", format_status(StatusKind::Warning, message));
}
