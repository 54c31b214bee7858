//! Report formatting and printing utilities.
//!
//! Changes are shown cargo-style; everything here writes to a caller-supplied
//! writer so the core stays usable as a library.

use std::io::Write;

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::{Change, ConfigWarning};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Totals of an extract run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub changes: usize,
    pub extracted: usize,
    pub reused: usize,
    pub errors: usize,
    pub is_apply: bool,
}

/// Print one change with its source line.
///
/// ```text
///   --> src/App.tsx:3:13
///      |
///    3 | const m = "___Hi___";
///      |           ^^^^^^^^^^
///      - "___Hi___"
///      + t("Hi")
/// ```
pub fn print_change_to<W: Write>(change: &Change, source_line: &str, writer: &mut W) {
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        change.file_path,
        change.line,
        change.column
    );
    let _ = writeln!(writer, "     {}", "|".blue());
    let _ = writeln!(
        writer,
        " {:>3} {} {}",
        change.line.to_string().blue(),
        "|".blue(),
        source_line
    );

    let prefix: String = source_line
        .chars()
        .take(change.column.saturating_sub(1))
        .collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let first_line = change.original.lines().next().unwrap_or("");
    let carets = "^".repeat(UnicodeWidthStr::width(first_line).max(1));
    let _ = writeln!(
        writer,
        "     {} {:>padding$}{}",
        "|".blue(),
        "",
        carets.yellow(),
        padding = caret_padding
    );

    for line in change.original.lines() {
        let _ = writeln!(writer, "     {} {}", "-".red(), line.red());
    }
    for line in change.replacement.lines() {
        let _ = writeln!(writer, "     {} {}", "+".green(), line.green());
    }
    let _ = writeln!(writer);
}

/// Print a file that could not be transformed.
pub fn print_file_error_to<W: Write>(file_path: &str, message: &str, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}: {}",
        "warning:".bold().yellow(),
        file_path,
        message
    );
}

pub fn print_config_warnings_to<W: Write>(warnings: &[ConfigWarning], writer: &mut W) {
    for warning in warnings {
        let _ = writeln!(
            writer,
            "{} {}  {}",
            "warning:".bold().yellow(),
            warning,
            format!("[{}]", warning.code()).dimmed().cyan()
        );
    }
}

pub fn print_summary_to<W: Write>(summary: &ExtractSummary, output_path: &str, writer: &mut W) {
    if summary.changes == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {} - nothing to extract",
                summary.files_scanned,
                plural(summary.files_scanned, "file", "files")
            )
            .green()
        );
    } else if summary.is_apply {
        let _ = writeln!(
            writer,
            "{} {} string(s) in {} {} ({} new, {} reused). Wrote {}.",
            "Extracted".green().bold(),
            summary.changes,
            summary.files_changed,
            plural(summary.files_changed, "file", "files"),
            summary.extracted,
            summary.reused,
            output_path
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} string(s) in {} {} ({} new, {} reused).",
            "Would extract".yellow().bold(),
            summary.changes,
            summary.files_changed,
            plural(summary.files_changed, "file", "files"),
            summary.extracted,
            summary.reused
        );
        let _ = writeln!(writer, "Run with {} to apply these changes.", "--apply".cyan());
    }

    if summary.errors > 0 {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be transformed and were left unchanged",
            FAILURE_MARK.red(),
            summary.errors
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
