//! Byte-exact comparison against the recorded `out.txt` / `err.txt`.

use std::fs;
use std::io;
use std::path::Path;

use crate::discovery::TestCase;
use crate::error::HarnessError;
use crate::runner::ExecutionResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        self == Outcome::Pass
    }
}

/// Expected stream contents for one case, read verbatim.
#[derive(Clone, Debug)]
pub struct Expected {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Expected {
    pub fn load(case: &TestCase) -> Result<Self, HarnessError> {
        Ok(Self {
            stdout: read_fixture(case, &case.expected_stdout_path)?,
            stderr: read_fixture(case, &case.expected_stderr_path)?,
        })
    }
}

fn read_fixture(case: &TestCase, path: &Path) -> Result<Vec<u8>, HarnessError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HarnessError::MissingFixture {
            case: case.name.clone(),
            path: path.to_path_buf(),
        },
        _ => HarnessError::FixtureRead {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

pub fn compare(expected: &Expected, actual: &ExecutionResult) -> Outcome {
    if actual.stdout == expected.stdout && actual.stderr == expected.stderr {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}

/// Which streams differ; only used for verbose logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamMismatch {
    pub stdout: bool,
    pub stderr: bool,
}

impl StreamMismatch {
    pub fn of(expected: &Expected, actual: &ExecutionResult) -> Self {
        Self {
            stdout: actual.stdout != expected.stdout,
            stderr: actual.stderr != expected.stderr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use tempfile::TempDir;

    fn actual(stdout: &[u8], stderr: &[u8]) -> ExecutionResult {
        ExecutionResult {
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
            elapsed_ms: 0,
            exit_status: Some(0),
        }
    }

    fn expected(stdout: &[u8], stderr: &[u8]) -> Expected {
        Expected {
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
        }
    }

    #[test]
    fn identical_streams_pass() {
        assert_eq!(compare(&expected(b"4\n", b""), &actual(b"4\n", b"")), Outcome::Pass);
    }

    #[test]
    fn stdout_difference_fails() {
        assert_eq!(compare(&expected(b"4\n", b""), &actual(b"5\n", b"")), Outcome::Fail);
    }

    #[test]
    fn missing_stderr_fails_even_with_matching_stdout() {
        let exp = expected(b"4\n", b"division by zero\n");
        let act = actual(b"4\n", b"");
        assert_eq!(compare(&exp, &act), Outcome::Fail);
        assert_eq!(
            StreamMismatch::of(&exp, &act),
            StreamMismatch {
                stdout: false,
                stderr: true
            }
        );
    }

    #[test]
    fn no_trailing_newline_normalization() {
        assert_eq!(compare(&expected(b"4\n", b""), &actual(b"4", b"")), Outcome::Fail);
        assert_eq!(compare(&expected(b"4", b""), &actual(b"4\n", b"")), Outcome::Fail);
        assert_eq!(
            compare(&expected(b"a\r\n", b""), &actual(b"a\n", b"")),
            Outcome::Fail
        );
    }

    #[test]
    fn exit_status_is_ignored() {
        let mut act = actual(b"4\n", b"");
        act.exit_status = Some(101);
        assert_eq!(compare(&expected(b"4\n", b""), &act), Outcome::Pass);
        act.exit_status = None;
        assert_eq!(compare(&expected(b"4\n", b""), &act), Outcome::Pass);
    }

    #[test]
    fn single_flipped_byte_in_binary_output_fails() {
        let mut payload = vec![0u8; 4096];
        rand::thread_rng().fill_bytes(&mut payload);
        let exp = expected(&payload, b"");
        assert_eq!(compare(&exp, &actual(&payload, b"")), Outcome::Pass);

        let mut flipped = payload.clone();
        flipped[2048] ^= 0x01;
        assert_eq!(compare(&exp, &actual(&flipped, b"")), Outcome::Fail);
    }

    #[test]
    fn load_reports_missing_fixture() {
        let dir = TempDir::new().unwrap();
        let case_dir = dir.path().join("case01");
        fs::create_dir(&case_dir).unwrap();
        fs::write(case_dir.join("out.txt"), b"4\n").unwrap();
        let case = TestCase::from_dir(&case_dir);

        match Expected::load(&case) {
            Err(HarnessError::MissingFixture { case, path }) => {
                assert_eq!(case, "case01");
                assert!(path.ends_with("err.txt"));
            }
            other => panic!("expected MissingFixture, got {other:?}"),
        }
    }

    #[test]
    fn load_reads_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let case_dir = dir.path().join("case01");
        fs::create_dir(&case_dir).unwrap();
        fs::write(case_dir.join("out.txt"), b"\xff\xfe\n").unwrap();
        fs::write(case_dir.join("err.txt"), b"").unwrap();

        let exp = Expected::load(&TestCase::from_dir(&case_dir)).unwrap();
        assert_eq!(exp.stdout, b"\xff\xfe\n");
        assert!(exp.stderr.is_empty());
    }
}
