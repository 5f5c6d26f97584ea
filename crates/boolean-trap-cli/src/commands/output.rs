//! Shared output formatting for lint results.

use anyhow::Result;
use boolean_trap_core::LintResult;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{} at {}:{}:{}",
            violation.code,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  \x1b[33mwarning\x1b[0m: {}", violation.message);
        println!();
    }

    let summary_color = if result.has_violations() {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let breakdown = result
        .count_by_code()
        .iter()
        .map(|(code, count)| format!("{code}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    print!(
        "{}Found {} boolean trap(s) in {} file(s)",
        summary_color,
        result.violations.len(),
        result.files_checked
    );
    if !breakdown.is_empty() {
        print!(" ({breakdown})");
    }
    if result.files_skipped > 0 {
        print!(", {} file(s) skipped", result.files_skipped);
    }
    println!("\x1b[0m");
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}
