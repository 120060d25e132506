//! Case discovery: every directory under the root whose name starts with the
//! case prefix, like `find <root> -type d -name 'case*'`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::error::HarnessError;

pub const INPUT_FILE: &str = "input.txt";
pub const STDOUT_FILE: &str = "out.txt";
pub const STDERR_FILE: &str = "err.txt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub dir: PathBuf,
    pub input_path: PathBuf,
    pub expected_stdout_path: PathBuf,
    pub expected_stderr_path: PathBuf,
}

impl TestCase {
    pub fn from_dir(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            dir: dir.to_path_buf(),
            input_path: dir.join(INPUT_FILE),
            expected_stdout_path: dir.join(STDOUT_FILE),
            expected_stderr_path: dir.join(STDERR_FILE),
        }
    }
}

/// Cases come back sorted by full path, so reruns see the same order.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<TestCase>> {
    if !root.is_dir() {
        return Err(HarnessError::MissingRoot(root.to_path_buf()).into());
    }
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.with_context(|| format!("walking {root:?}"))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(pattern) {
            dirs.push(entry.into_path());
        }
    }
    dirs.sort();

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut cases = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let case = TestCase::from_dir(&dir);
        if let Some(first) = seen.insert(case.name.clone(), dir.clone()) {
            return Err(HarnessError::DuplicateCase {
                name: case.name,
                first,
                second: dir,
            }
            .into());
        }
        cases.push(case);
    }
    Ok(cases)
}

pub fn filter_cases(cases: Vec<TestCase>, filter: Option<&str>) -> Vec<TestCase> {
    match filter {
        Some(f) => cases.into_iter().filter(|c| c.name.contains(f)).collect(),
        None => cases,
    }
}
