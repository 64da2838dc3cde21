//! Configuration loading and management.

use crate::cli::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use smol_str::SmolStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wxml_converter::ConvertOptions;

/// Name of the configuration file looked up in the workspace.
pub const CONFIG_FILE: &str = "wx2vue.json";

const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**", "**/dist/**", "**/.git/**"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid ignore pattern `{pattern}`")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Contents of `wx2vue.json`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileConfig {
    pub extensions: Option<Vec<String>>,
    pub ignore: Vec<String>,
    pub indent_width: Option<usize>,
    pub tag_overrides: IndexMap<SmolStr, SmolStr>,
    pub out_extension: Option<String>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory.
    pub workspace: PathBuf,
    /// The configuration file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    /// File extensions to process, with the leading dot.
    pub extensions: Vec<String>,
    /// Ignore patterns.
    pub ignore_patterns: Vec<String>,
    ignore: GlobSet,
    /// Extension for files written to the output directory.
    pub out_extension: String,
    pub convert: ConvertOptions,
}

impl Config {
    /// Load configuration from CLI arguments and workspace.
    pub fn load(workspace: &Path, args: &Args) -> Result<Self, ConfigError> {
        let config_path = args.config.clone().or_else(|| {
            let candidate = workspace.join(CONFIG_FILE);
            candidate.is_file().then_some(candidate)
        });

        let file = match &config_path {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };

        let extensions = file
            .extensions
            .unwrap_or_else(|| vec![".wxml".to_string()])
            .into_iter()
            .map(|e| if e.starts_with('.') { e } else { format!(".{e}") })
            .collect();

        let mut ignore_patterns: Vec<String> =
            DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect();
        ignore_patterns.extend(file.ignore);
        ignore_patterns.extend(args.ignore.iter().cloned());

        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|source| ConfigError::Glob {
            pattern: ignore_patterns.join(", "),
            source,
        })?;

        let mut convert = ConvertOptions {
            tag_overrides: file.tag_overrides,
            ..Default::default()
        };
        if let Some(width) = file.indent_width {
            convert.indent_width = width;
        }

        let out_extension = file
            .out_extension
            .map(|e| e.trim_start_matches('.').to_string())
            .unwrap_or_else(|| args.mode.default_extension().to_string());

        Ok(Self {
            workspace: workspace.to_path_buf(),
            config_path,
            extensions,
            ignore_patterns,
            ignore,
            out_extension,
            convert,
        })
    }

    /// Check if a file should be processed.
    pub fn should_process(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        if !self.extensions.iter().any(|e| e == &ext) {
            return false;
        }

        let relative = path.strip_prefix(&self.workspace).unwrap_or(path);
        !self.ignore.is_match(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["wx2vue"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), &args(&[])).unwrap();

        assert!(config.config_path.is_none());
        assert_eq!(config.extensions, vec![".wxml"]);
        assert_eq!(config.out_extension, "vue");
        assert_eq!(config.convert.indent_width, 2);
        assert!(config.should_process(&dir.path().join("pages/index.wxml")));
        assert!(!config.should_process(&dir.path().join("pages/index.js")));
        assert!(!config.should_process(&dir.path().join("node_modules/x/a.wxml")));
    }

    #[test]
    fn test_file_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{
                "extensions": ["wxml", ".axml"],
                "ignore": ["**/legacy/**"],
                "indentWidth": 4,
                "tagOverrides": { "my-card": "Card" },
                "outExtension": ".html"
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path(), &args(&["--ignore", "**/scratch/**"])).unwrap();
        assert_eq!(config.extensions, vec![".wxml", ".axml"]);
        assert_eq!(config.out_extension, "html");
        assert_eq!(config.convert.indent_width, 4);
        assert_eq!(
            config.convert.tag_overrides.get("my-card").map(|s| s.as_str()),
            Some("Card")
        );
        assert!(config.should_process(&dir.path().join("a.axml")));
        assert!(!config.should_process(&dir.path().join("legacy/a.wxml")));
        assert!(!config.should_process(&dir.path().join("scratch/a.wxml")));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load(dir.path(), &args(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.to_string(), format!("invalid configuration in {}", path.display()));
    }

    #[test]
    fn test_invalid_glob() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path(), &args(&["--ignore", "a[b"])).unwrap_err();
        assert!(matches!(err, ConfigError::Glob { .. }));
    }
}
