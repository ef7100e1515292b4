//! Output formatting utilities

use console::{style, Style, StyledObject};

use skein_tasks::TaskState;

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

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for paths and URLs
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// One-character mark for a task state
pub fn state_mark(state: TaskState) -> StyledObject<&'static str> {
    match state {
        TaskState::Succeeded => style("✓").green(),
        TaskState::Failed => style("✗").red(),
        TaskState::Loading | TaskState::Loaded => style("…").blue(),
        TaskState::Waiting | TaskState::Ready => style("·").yellow(),
        TaskState::Dormant => style("·").dim(),
    }
}
