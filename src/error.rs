use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The subject binary could not be started at all.
    #[error("cannot launch subject {path:?}: {source}")]
    SubjectLaunch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An expected output file is absent for a discovered case.
    #[error("case {case}: fixture missing: {path:?}")]
    MissingFixture { case: String, path: PathBuf },

    #[error("cannot read fixture {path:?}: {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("case name {name:?} appears twice: {first:?} and {second:?}")]
    DuplicateCase {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("case root {0:?} is not a directory")]
    MissingRoot(PathBuf),

    #[error("build step failed: {0}")]
    BuildFailed(String),
}
