//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Convert mini-program WXML templates to Vue templates
#[derive(Parser, Debug, Clone)]
#[command(name = "wx2vue")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Files or directories to process (default: the workspace)
    pub paths: Vec<PathBuf>,

    /// Workspace directory
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Path to wx2vue.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// What to produce for each template
    #[arg(short, long, default_value = "convert")]
    pub mode: Mode,

    /// Write results here instead of stdout, mirroring the input layout
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Output format for diagnostics
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Fail on warnings
    #[arg(long)]
    pub fail_on_warning: bool,

    /// Maximum number of diagnostics to show
    #[arg(long)]
    pub max_errors: Option<usize>,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Show timing information
    #[arg(long)]
    pub timings: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// What is produced for each template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Vue template markup
    #[default]
    Convert,
    /// WXML with a `ref` on every element
    Annotate,
    /// The parsed tree as JSON
    Tree,
}

impl Mode {
    /// Extension used for files written to `--out-dir`, unless configured.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Convert => "vue",
            Self::Annotate => "wxml",
            Self::Tree => "json",
        }
    }
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["wx2vue", "pages"]);
        assert_eq!(args.paths, vec![PathBuf::from("pages")]);
        assert_eq!(args.mode, Mode::Convert);
        assert_eq!(args.output, OutputFormat::Human);
        assert!(args.out_dir.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "wx2vue",
            "--mode",
            "annotate",
            "--output",
            "json",
            "--ignore",
            "**/legacy/**",
            "--ignore",
            "**/tmp/**",
            "--max-errors",
            "5",
            "--fail-on-warning",
        ]);
        assert_eq!(args.mode, Mode::Annotate);
        assert_eq!(args.output, OutputFormat::Json);
        assert_eq!(args.ignore.len(), 2);
        assert_eq!(args.max_errors, Some(5));
        assert!(args.fail_on_warning);
    }
}
