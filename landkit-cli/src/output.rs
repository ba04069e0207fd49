//! Report formatting for the `check` command.

use std::io::Write;

use colored::Colorize;
use landkit::PayloadReport;
use serde::Serialize;

/// Write `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<T: Serialize + ?Sized>(value: &T, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `PayloadReport` as human-readable text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &PayloadReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  {}", "LANDKIT CONTACT PAYLOAD CHECK".bold())?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Fields checked:    {}", report.checked_fields)?;
    writeln!(writer, "  Fields unchecked:  {}", report.unchecked_fields.len())?;
    writeln!(writer, "  Errors found:      {}", report.errors_count())?;
    writeln!(writer)?;

    if !report.field_errors.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  FIELD ERRORS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for error in &report.field_errors {
            writeln!(writer, "{}", error.format_human_readable().red())?;
        }
        writeln!(writer)?;
    }

    if !report.unchecked_fields.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  UNCHECKED FIELDS (no rule and not required)")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for name in &report.unchecked_fields {
            writeln!(writer, "{}", name.dimmed())?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.ok {
        let line = format!(
            "\u{2713} All {} checked fields passed validation",
            report.checked_fields
        );
        writeln!(writer, "{}", line.green())?;
    } else {
        let line = format!("\u{2717} {} invalid field(s) found", report.errors_count());
        writeln!(writer, "{}", line.red().bold())?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
