//! Output formatting for results and diagnostics.

use crate::cli::OutputFormat;
use crate::orchestrator::{CheckResult, Diagnostic, Severity};
use std::path::Path;

/// Formatter for diagnostic output.
///
/// In human format converted templates go to stdout and everything else to
/// stderr. In JSON format every record is one line on stdout.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the generated text for one file.
    pub fn print_output(&self, file: &Path, output: &str) {
        match self.format {
            OutputFormat::Human => println!("{output}"),
            OutputFormat::Json => println!("{}", self.output_json(file, output)),
        }
    }

    pub fn print_diagnostic(&self, file: &Path, diagnostic: &Diagnostic) {
        match self.format {
            OutputFormat::Human => eprintln!("{}", self.diagnostic_human(file, diagnostic)),
            OutputFormat::Json => println!("{}", self.diagnostic_json(file, diagnostic)),
        }
    }

    pub fn print_summary(&self, result: &CheckResult) {
        match self.format {
            OutputFormat::Human => eprint!("{}", self.summary_human(result)),
            OutputFormat::Json => println!("{}", self.summary_json(result)),
        }
    }

    // Human format

    fn diagnostic_human(&self, file: &Path, diagnostic: &Diagnostic) -> String {
        let severity = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };
        let code = diagnostic
            .code
            .map(|c| format!("[{c}] "))
            .unwrap_or_default();

        format!(
            "{}:{}:{}: {}: {}{}",
            file.display(),
            diagnostic.line,
            diagnostic.column,
            severity,
            code,
            diagnostic.message
        )
    }

    fn summary_human(&self, result: &CheckResult) -> String {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let mut text = String::from("\n");

        if result.error_count == 0 && result.warning_count == 0 {
            text.push_str(&format!(
                "\x1b[32m✓\x1b[0m Converted {} file{} without issues ({}ms)\n",
                result.file_count,
                plural(result.file_count),
                result.duration_ms
            ));
            return text;
        }

        if result.error_count > 0 {
            text.push_str(&format!(
                "\x1b[31m✗\x1b[0m Found {} error{} in {} file{}\n",
                result.error_count,
                plural(result.error_count),
                result.file_count,
                plural(result.file_count)
            ));
        }
        if result.warning_count > 0 {
            text.push_str(&format!(
                "\x1b[33m⚠\x1b[0m Found {} warning{}\n",
                result.warning_count,
                plural(result.warning_count)
            ));
        }
        text.push_str(&format!("Time: {}ms\n", result.duration_ms));
        text
    }

    // JSON format

    fn output_json(&self, file: &Path, output: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "output",
            "file": file.to_string_lossy(),
            "content": output
        })
    }

    fn diagnostic_json(&self, file: &Path, diagnostic: &Diagnostic) -> serde_json::Value {
        serde_json::json!({
            "type": "diagnostic",
            "file": file.to_string_lossy(),
            "severity": diagnostic.severity.as_str(),
            "code": diagnostic.code,
            "message": diagnostic.message,
            "line": diagnostic.line,
            "column": diagnostic.column,
            "span": {
                "start": diagnostic.start,
                "end": diagnostic.end
            }
        })
    }

    fn summary_json(&self, result: &CheckResult) -> serde_json::Value {
        serde_json::json!({
            "type": "summary",
            "files": result.file_count,
            "errors": result.error_count,
            "warnings": result.warning_count,
            "duration_ms": result.duration_ms
        })
    }
}
