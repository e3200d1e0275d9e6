//! Display formatting for CLI output
//!
//! Diagnostics go to stderr, grouped under their summary with the attribute
//! path dimmed; data (JSON, YAML) goes to stdout so it can be piped.

use console::style;
use traefik_provider::{DiagnosticResult, Diagnostics, Severity};

use crate::error::{CliError, Result};

/// Format diagnostics, one per line plus an indented detail
pub fn format_diagnostics(diagnostics: &Diagnostics) -> String {
    let mut out = String::new();

    for diagnostic in diagnostics.iter() {
        let icon = match diagnostic.severity {
            Severity::Error => style("✗").red(),
            Severity::Warning => style("⚠").yellow(),
        };

        let at = match &diagnostic.attribute {
            Some(path) => format!(" at {}", style(path).dim()),
            None => String::new(),
        };

        out.push_str(&format!("{} {}{}\n", icon, style(&diagnostic.summary).bold(), at));
        if !diagnostic.detail.is_empty() {
            out.push_str(&format!("    {}\n", diagnostic.detail));
        }
    }

    out
}

/// Print every diagnostic to stderr
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    if !diagnostics.is_empty() {
        eprint!("{}", format_diagnostics(diagnostics));
    }
}

/// Unwrap a provider outcome, printing diagnostics on failure
pub fn report<T>(outcome: DiagnosticResult<T>) -> Result<T> {
    outcome.map_err(|diagnostics| {
        print_diagnostics(&diagnostics);
        CliError::reported(&diagnostics)
    })
}

/// Print a success line to stderr
pub fn success(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an informational line to stderr
pub fn info(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("→").blue(), message);
}
