//! The sequential discover -> run -> compare -> report loop.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::compare::{compare, Expected, Outcome, StreamMismatch};
use crate::config::HarnessConfig;
use crate::discovery::{discover, filter_cases, TestCase};
use crate::error::HarnessError;
use crate::report::Reporter;
use crate::runner::{check_subject, run_case};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailReason {
    Mismatch,
    FixtureMissing(PathBuf),
    FixtureUnreadable(PathBuf),
}

#[derive(Clone, Debug)]
pub struct CaseResult {
    pub case: TestCase,
    pub outcome: Outcome,
    pub elapsed_ms: u64,
    pub exit_status: Option<i32>,
    pub reason: Option<FailReason>,
}

/// Results in run order. `all_passed` is derived, never stored.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub results: Vec<CaseResult>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_pass())
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.results.iter().map(|r| r.outcome).collect()
    }
}

impl FromIterator<CaseResult> for RunSummary {
    fn from_iter<I: IntoIterator<Item = CaseResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn cases(&self) -> Result<Vec<TestCase>> {
        let cases = discover(&self.config.root, &self.config.pattern)?;
        Ok(filter_cases(cases, self.config.filter.as_deref()))
    }

    /// Runs every case in order, streaming one report line per case.
    ///
    /// Only a subject that cannot be launched stops the run; fixture problems
    /// and mismatches become failed cases.
    pub fn run<W: Write>(&self, reporter: &mut Reporter<W>) -> Result<RunSummary> {
        check_subject(&self.config.subject)?;
        let cases = self.cases()?;
        let summary = cases
            .into_iter()
            .map(|case| {
                let result = self.run_one(case)?;
                reporter
                    .case_line(&result)
                    .context("writing case result")?;
                Ok(result)
            })
            .collect::<Result<RunSummary>>()?;
        reporter.finish(&summary).context("writing summary")?;
        Ok(summary)
    }

    fn run_one(&self, case: TestCase) -> Result<CaseResult> {
        if !self.config.delay.is_zero() {
            std::thread::sleep(self.config.delay);
        }
        if self.config.verbose {
            println!("[RUN ] {}", case.name);
        }

        if !case.input_path.is_file() {
            let path = case.input_path.clone();
            return Ok(fixture_failure(case, FailReason::FixtureMissing(path)));
        }
        let expected = match Expected::load(&case) {
            Ok(expected) => expected,
            Err(HarnessError::MissingFixture { path, .. }) => {
                return Ok(fixture_failure(case, FailReason::FixtureMissing(path)));
            }
            Err(HarnessError::FixtureRead { path, source }) => {
                if self.config.verbose {
                    println!("[FIX ] {}: {source}", path.display());
                }
                return Ok(fixture_failure(case, FailReason::FixtureUnreadable(path)));
            }
            Err(other) => return Err(other.into()),
        };

        let actual = run_case(&self.config.subject, &case)?;
        if self.config.verbose {
            println!(
                "[CMD ] {:?} {:?} -> status {:?}, stdout {}B, stderr {}B",
                self.config.subject,
                case.input_path,
                actual.exit_status,
                actual.stdout.len(),
                actual.stderr.len()
            );
        }

        let outcome = compare(&expected, &actual);
        if outcome == Outcome::Fail && self.config.verbose {
            let diff = StreamMismatch::of(&expected, &actual);
            println!(
                "[DIFF] stdout differs? {} stderr differs? {}",
                diff.stdout, diff.stderr
            );
        }
        Ok(CaseResult {
            case,
            outcome,
            elapsed_ms: actual.elapsed_ms,
            exit_status: actual.exit_status,
            reason: (outcome == Outcome::Fail).then_some(FailReason::Mismatch),
        })
    }
}

fn fixture_failure(case: TestCase, reason: FailReason) -> CaseResult {
    CaseResult {
        case,
        outcome: Outcome::Fail,
        elapsed_ms: 0,
        exit_status: None,
        reason: Some(reason),
    }
}
