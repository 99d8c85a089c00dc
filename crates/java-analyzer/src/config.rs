//! Analyzer configuration.
//!
//! Settings come from three layers: built-in defaults, an optional
//! `java-analyzer.toml`, and the command line. Later layers win per
//! field; a flag passed on the command line replaces the whole list it
//! names.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

pub const CONFIG_FILE_NAME: &str = "java-analyzer.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyzerConfig {
    /// Directories scanned for `.java` files during resolution.
    pub source_roots: Vec<PathBuf>,
    /// Extra directories resolution may read but never scans eagerly.
    pub dependency_roots: Vec<PathBuf>,
    /// Build output directory whose stale artifacts are reset at startup.
    pub output_root: Option<PathBuf>,
}

/// Partial settings as read from `java-analyzer.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigPatch {
    source_roots: Option<Vec<PathBuf>>,
    dependency_roots: Option<Vec<PathBuf>>,
    output_root: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    NoSourceRoots,
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            },
            Self::Parse { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            },
            Self::NoSourceRoots => {
                write!(f, "no source roots configured; pass --source-root or add source-roots to {CONFIG_FILE_NAME}")
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NoSourceRoots => None,
        }
    }
}

impl AnalyzerConfig {
    /// Merge defaults, the TOML file, and command-line values. An
    /// explicitly named config file must exist; the implicit one in the
    /// working directory is optional.
    pub fn load(
        config_file: Option<&Path>,
        cli_source_roots: &[PathBuf],
        cli_dependency_roots: &[PathBuf],
        cli_output_root: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match config_file {
            Some(path) => {
                config.apply_patch(read_patch(path)?);
            },
            None => {
                let fallback = Path::new(CONFIG_FILE_NAME);
                if fallback.exists() {
                    config.apply_patch(read_patch(fallback)?);
                }
            },
        }

        if !cli_source_roots.is_empty() {
            config.source_roots = cli_source_roots.to_vec();
        }
        if !cli_dependency_roots.is_empty() {
            config.dependency_roots = cli_dependency_roots.to_vec();
        }
        if let Some(root) = cli_output_root {
            config.output_root = Some(root.to_path_buf());
        }

        config.normalize();
        if config.source_roots.is_empty() {
            return Err(ConfigError::NoSourceRoots);
        }
        Ok(config)
    }

    fn apply_patch(
        &mut self,
        patch: ConfigPatch,
    ) {
        if let Some(roots) = patch.source_roots {
            self.source_roots = roots;
        }
        if let Some(roots) = patch.dependency_roots {
            self.dependency_roots = roots;
        }
        if let Some(root) = patch.output_root {
            self.output_root = Some(root);
        }
    }

    fn normalize(&mut self) {
        let cwd = std::env::current_dir().ok();
        let absolutize = |path: PathBuf| -> PathBuf {
            if path.is_absolute() {
                path
            } else if let Some(cwd) = &cwd {
                cwd.join(path)
            } else {
                path
            }
        };
        self.source_roots = dedup_paths(
            self.source_roots.drain(..).map(absolutize).collect(),
        );
        self.dependency_roots = dedup_paths(
            self.dependency_roots.drain(..).map(absolutize).collect(),
        );
        self.output_root = self.output_root.take().map(absolutize);
    }

    /// Roots to consult for on-demand type loading, source roots first.
    pub fn lookup_roots(&self) -> Vec<PathBuf> {
        let mut roots = self.source_roots.clone();
        roots.extend(self.dependency_roots.iter().cloned());
        dedup_paths(roots)
    }
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = Vec::new();
    for path in paths {
        if !seen.contains(&path) {
            seen.push(path);
        }
    }
    seen
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reset the timestamps of compiled `.class` files under the output root
/// so downstream tooling treats them as out of date. Returns how many
/// files were touched; unreadable entries are skipped.
pub fn reset_output_artifacts(output_root: &Path) -> usize {
    let mut touched = 0;
    for entry in WalkDir::new(output_root).into_iter().flatten() {
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some("class")
        {
            continue;
        }
        let times = fs::FileTimes::new().set_modified(SystemTime::UNIX_EPOCH);
        let outcome = fs::File::options()
            .write(true)
            .open(path)
            .and_then(|file| file.set_times(times));
        match outcome {
            Ok(()) => touched += 1,
            Err(error) => {
                debug!(path = %path.display(), %error, "skipping artifact");
            },
        }
    }
    touched
}

#[cfg(test)]
#[path = "../tests/src/config_tests.rs"]
mod tests;
