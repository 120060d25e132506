use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use anyhow::{Context, Result};
use nix::unistd::{access, AccessFlags};

use crate::discovery::TestCase;
use crate::error::HarnessError;

#[derive(Clone, Debug)]
pub struct ExecutionResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed_ms: u64,
    /// `None` when the subject died from a signal.
    pub exit_status: Option<i32>,
}

/// Fails fast when the subject is missing or not executable.
pub fn check_subject(subject: &Path) -> Result<(), HarnessError> {
    if !subject.is_file() {
        return Err(HarnessError::SubjectLaunch {
            path: subject.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        });
    }
    access(subject, AccessFlags::X_OK).map_err(|errno| HarnessError::SubjectLaunch {
        path: subject.to_path_buf(),
        source: io::Error::from(errno),
    })
}

/// Runs `<subject> <input_path>` and captures both streams.
///
/// The clock covers spawn through exit only. The exit status is recorded
/// but plays no part in judging the case. Only a failed spawn is a `SubjectLaunch` error.
pub fn run_case(subject: &Path, case: &TestCase) -> Result<ExecutionResult> {
    let mut command = Command::new(subject);
    command
        .arg(&case.input_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let started = Instant::now();
    let child = command.spawn().map_err(|source| HarnessError::SubjectLaunch {
        path: subject.to_path_buf(),
        source,
    })?;
    let output = child
        .wait_with_output()
        .with_context(|| format!("waiting for {subject:?}"))?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(ExecutionResult {
        stdout: output.stdout,
        stderr: output.stderr,
        elapsed_ms,
        exit_status: output.status.code(),
    })
}

/// `cargo build --release` (and optionally `cargo test`) in the subject project.
pub fn build_subject(project_dir: &Path, unit_tests: bool) -> Result<()> {
    println!("[build] cargo build --release in {}", project_dir.display());
    let mut build = Command::new("cargo");
    build.current_dir(project_dir).args(["build", "--release"]);
    run_status(build)?;
    if unit_tests {
        println!("[build] cargo test in {}", project_dir.display());
        let mut test = Command::new("cargo");
        test.current_dir(project_dir).arg("test");
        run_status(test)?;
    }
    Ok(())
}

fn run_status(mut cmd: Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("spawning {cmd:?}"))?;
    if !status.success() {
        return Err(HarnessError::BuildFailed(format!("{cmd:?} exited with {status}")).into());
    }
    Ok(())
}
