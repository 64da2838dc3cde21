//! Orchestrator for converting a set of templates.

use crate::cli::{Args, Mode};
use crate::config::Config;
use crate::output::OutputFormatter;
use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use wxml_converter::{annotate, convert_with, tree_to_text};
use wxml_parser::{parse_template, ParseError, ParseWarning};

/// Result of a run.
#[derive(Debug, Default)]
pub struct CheckResult {
    /// Number of files processed.
    pub file_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Time taken.
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A parser diagnostic attached to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub start: u32,
    pub end: u32,
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Self {
            severity: Severity::Error,
            code: Some(err.code.as_str()),
            message: err.message.clone(),
            line: err.line,
            column: err.column,
            start: err.span.start,
            end: err.span.end,
        }
    }
}

impl From<&ParseWarning> for Diagnostic {
    fn from(warning: &ParseWarning) -> Self {
        Self {
            severity: Severity::Warning,
            code: None,
            message: warning.message.clone(),
            line: warning.line,
            column: warning.column,
            start: warning.span.start,
            end: warning.span.end,
        }
    }
}

/// What came out of one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Orchestrator for running wx2vue.
pub struct Orchestrator {
    config: Config,
    args: Args,
    formatter: OutputFormatter,
}

impl Orchestrator {
    pub fn new(workspace: PathBuf, args: Args) -> Result<Self> {
        let config = Config::load(&workspace, &args).into_diagnostic()?;
        let formatter = OutputFormatter::new(args.output);

        Ok(Self {
            config,
            args,
            formatter,
        })
    }

    /// Process every input once and report.
    pub fn run(&self) -> Result<CheckResult> {
        let start = Instant::now();

        let files = self.find_files()?;
        if self.args.verbose {
            eprintln!("Found {} template files", files.len());
            if let Some(path) = &self.config.config_path {
                eprintln!("Using configuration {}", path.display());
            }
            eprintln!("Ignoring {}", self.config.ignore_patterns.join(", "));
        }

        let outcomes = self.process_files(&files)?;
        for outcome in &outcomes {
            self.emit(outcome)?;
        }
        let (error_count, warning_count) = self.report(&outcomes);

        let check_result = CheckResult {
            file_count: files.len(),
            error_count,
            warning_count,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if self.args.timings {
            eprintln!("\nTiming: {}ms", check_result.duration_ms);
        }
        self.formatter.print_summary(&check_result);

        Ok(check_result)
    }

    /// Whether the run should exit with a failure code.
    pub fn failed(&self, result: &CheckResult) -> bool {
        result.error_count > 0 || (self.args.fail_on_warning && result.warning_count > 0)
    }

    /// Explicit files are taken as given; directories are walked and filtered.
    fn find_files(&self) -> Result<Vec<PathBuf>> {
        let roots = if self.args.paths.is_empty() {
            vec![self.config.workspace.clone()]
        } else {
            self.args.paths.clone()
        };

        let mut files = Vec::new();
        for root in roots {
            if root.is_file() {
                files.push(root);
                continue;
            }
            if !root.is_dir() {
                return Err(miette::miette!("No such file or directory: {}", root.display()));
            }

            for entry in walkdir::WalkDir::new(&root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if entry.file_type().is_dir() || !self.config.should_process(path) {
                    continue;
                }
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    fn process_files(&self, files: &[PathBuf]) -> Result<Vec<FileOutcome>> {
        files
            .par_iter()
            .map(|file| self.process_file(file))
            .collect()
    }

    /// Parse and transform a single file.
    fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

        let parsed = parse_template(&source);
        let output = match self.args.mode {
            Mode::Convert => convert_with(&parsed.tree, &self.config.convert),
            Mode::Annotate => tree_to_text(&annotate(&parsed.tree)),
            Mode::Tree => serde_json::to_string_pretty(&parsed.tree).into_diagnostic()?,
        };

        let diagnostics = parsed
            .errors
            .iter()
            .map(Diagnostic::from)
            .chain(parsed.warnings.iter().map(Diagnostic::from))
            .collect();

        Ok(FileOutcome {
            path: path.to_path_buf(),
            output,
            diagnostics,
        })
    }

    /// Where `input` is written under `out_dir`.
    pub fn output_path(&self, out_dir: &Path, input: &Path) -> PathBuf {
        let relative = input
            .strip_prefix(&self.config.workspace)
            .ok()
            .filter(|r| !r.as_os_str().is_empty())
            .unwrap_or_else(|| input.file_name().map(Path::new).unwrap_or(input));
        out_dir
            .join(relative)
            .with_extension(&self.config.out_extension)
    }

    fn emit(&self, outcome: &FileOutcome) -> Result<()> {
        match &self.args.out_dir {
            Some(out_dir) => {
                let target = self.output_path(out_dir, &outcome.path);
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .into_diagnostic()
                        .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
                }
                let mut text = outcome.output.clone();
                text.push('\n');
                std::fs::write(&target, text)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to write {}", target.display()))?;
                if self.args.verbose {
                    eprintln!("{} -> {}", outcome.path.display(), target.display());
                }
            }
            None => self.formatter.print_output(&outcome.path, &outcome.output),
        }
        Ok(())
    }

    /// Print diagnostics up to `--max-errors` and return error/warning counts.
    fn report(&self, outcomes: &[FileOutcome]) -> (usize, usize) {
        let mut error_count = 0;
        let mut warning_count = 0;
        let mut shown = 0;
        let limit = self.args.max_errors.unwrap_or(usize::MAX);

        for outcome in outcomes {
            for diag in &outcome.diagnostics {
                match diag.severity {
                    Severity::Error => error_count += 1,
                    Severity::Warning => warning_count += 1,
                }
                if shown < limit {
                    self.formatter.print_diagnostic(&outcome.path, diag);
                    shown += 1;
                }
            }
        }

        if shown < error_count + warning_count {
            eprintln!(
                "... {} more diagnostics not shown",
                error_count + warning_count - shown
            );
        }

        (error_count, warning_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn orchestrator(workspace: &Path, extra: &[&str]) -> Orchestrator {
        let mut argv = vec!["wx2vue", "--output", "json"];
        argv.extend_from_slice(extra);
        Orchestrator::new(workspace.to_path_buf(), Args::parse_from(argv)).unwrap()
    }

    fn write(dir: &Path, name: &str, text: &str) {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_converts_into_out_dir() {
        let workspace = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(
            workspace.path(),
            "pages/index/index.wxml",
            r#"<view wx:if="{{ ok }}"><text bindtap="go">{{ msg }}</text></view>"#,
        );
        write(workspace.path(), "pages/index/index.js", "Page({})");
        write(workspace.path(), "node_modules/lib/a.wxml", "<view/>");

        let out_dir = out.path().to_string_lossy().to_string();
        let orch = orchestrator(workspace.path(), &["--out-dir", out_dir.as_str()]);
        let result = orch.run().unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(result.error_count, 0);
        assert!(!orch.failed(&result));

        let written = std::fs::read_to_string(out.path().join("pages/index/index.vue")).unwrap();
        assert_eq!(
            written,
            "<div v-if=\"ok\">\n  <span @click=\"go\">{{ msg }}</span>\n</div>\n"
        );
    }

    #[test]
    fn test_counts_diagnostics() {
        let workspace = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(workspace.path(), "a.wxml", "<view></text>");
        write(workspace.path(), "b.wxml", "<view>");

        let out_dir = out.path().to_string_lossy().to_string();
        let orch = orchestrator(workspace.path(), &["--out-dir", out_dir.as_str()]);
        let result = orch.run().unwrap();

        assert_eq!(result.file_count, 2);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 1);
        assert!(orch.failed(&result));
    }

    #[test]
    fn test_fail_on_warning() {
        let workspace = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(workspace.path(), "b.wxml", "<view>");

        let out_dir = out.path().to_string_lossy().to_string();
        let lenient = orchestrator(workspace.path(), &["--out-dir", out_dir.as_str()]);
        let result = lenient.run().unwrap();
        assert!(!lenient.failed(&result));

        let strict = orchestrator(workspace.path(), &["--out-dir", out_dir.as_str(), "--fail-on-warning"]);
        let result = strict.run().unwrap();
        assert!(strict.failed(&result));
    }

    #[test]
    fn test_annotate_mode() {
        let workspace = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(workspace.path(), "card.wxml", "<view><image src=\"a\" /></view>");

        let out_dir = out.path().to_string_lossy().to_string();
        let orch = orchestrator(workspace.path(), &["--mode", "annotate", "--out-dir", out_dir.as_str()]);
        orch.run().unwrap();

        let written = std::fs::read_to_string(out.path().join("card.wxml")).unwrap();
        assert_eq!(
            written,
            "<view ref=\"devtools_1_view\">\n  <image src=\"a\" ref=\"devtools_1-1_image\" />\n</view>\n"
        );
    }

    #[test]
    fn test_tree_mode() {
        let workspace = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(workspace.path(), "a.wxml", "<view>hi</view>");

        let out_dir = out.path().to_string_lossy().to_string();
        let orch = orchestrator(workspace.path(), &["--mode", "tree", "--out-dir", out_dir.as_str()]);
        orch.run().unwrap();

        let written = std::fs::read_to_string(out.path().join("a.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[0]["type"], "element");
        assert_eq!(value[0]["tag"], "view");
        assert_eq!(value[0]["children"][0]["content"], "hi");
    }

    #[test]
    fn test_missing_input() {
        let workspace = tempfile::tempdir().unwrap();
        let missing = workspace.path().join("nope").to_string_lossy().to_string();
        let orch = orchestrator(workspace.path(), &[missing.as_str()]);
        assert!(orch.run().is_err());
    }

    #[test]
    fn test_output_path_outside_workspace() {
        let workspace = tempfile::tempdir().unwrap();
        let orch = orchestrator(workspace.path(), &[]);
        assert_eq!(
            orch.output_path(Path::new("out"), Path::new("/elsewhere/page.wxml")),
            PathBuf::from("out/page.vue")
        );
        assert_eq!(
            orch.output_path(Path::new("out"), &workspace.path().join("a/b.wxml")),
            PathBuf::from("out/a/b.vue")
        );
    }
}
