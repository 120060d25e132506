//! Resolved harness configuration.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;

pub const DEFAULT_PATTERN: &str = "case";
pub const DEFAULT_BIN: &str = "defiro";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

/// Everything the pipeline needs, fixed before the first case runs.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub subject: PathBuf,
    pub root: PathBuf,
    pub pattern: String,
    pub delay: Duration,
    pub filter: Option<String>,
    pub verbose: bool,
}

impl HarnessConfig {
    pub fn new(subject: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            subject: subject.into(),
            root: root.into(),
            pattern: DEFAULT_PATTERN.to_string(),
            delay: Duration::ZERO,
            filter: None,
            verbose: false,
        }
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

/// Directory layout around the harness crate: it lives in `<project>/test/`.
#[derive(Clone, Debug)]
pub struct Layout {
    pub harness_dir: PathBuf,
    pub project_dir: PathBuf,
}

impl Layout {
    pub fn from_manifest_dir(dir: &Path) -> Result<Self> {
        let project_dir = dir
            .parent()
            .context("expected the harness crate to have a parent")?
            .to_path_buf();
        Ok(Self {
            harness_dir: dir.to_path_buf(),
            project_dir,
        })
    }

    pub fn release_binary(&self, bin: &str) -> PathBuf {
        self.project_dir.join("target").join("release").join(bin)
    }
}

/// Turn a `--subject` argument into a path; bare names are looked up on PATH.
pub fn resolve_subject(arg: &Path) -> Result<PathBuf> {
    if arg.components().count() > 1 || arg.is_absolute() {
        return Ok(arg.to_path_buf());
    }
    which::which(arg).with_context(|| format!("subject {arg:?} not found on PATH"))
}
