//! Per-case result lines and the closing banner.
//!
//! Line layout is `name` padded to 15 columns, elapsed milliseconds padded to
//! 4, then `ok` or `fault`. A run with no failures ends with a blank line and
//! `all ok!!`; a run with failures ends after its last case line.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use crate::compare::Outcome;
use crate::harness::{CaseResult, FailReason, RunSummary};

pub const NAME_WIDTH: usize = 15;
pub const ELAPSED_WIDTH: usize = 4;
pub const SUCCESS_BANNER: &str = "all ok!!";

pub struct Reporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Reporter<W> {
    /// With `color` set, markers are colored even when stdout is not a
    /// terminal.
    pub fn new(out: W, color: bool) -> Self {
        if color {
            colored::control::set_override(true);
        }
        Self { out, color }
    }

    pub fn case_line(&mut self, result: &CaseResult) -> io::Result<()> {
        let mut line = format!(
            "{} {}ms ... {}",
            pad_name(&result.case.name),
            pad_elapsed(result.elapsed_ms),
            self.marker(result.outcome)
        );
        if let Some(reason) = &result.reason {
            if let Some(note) = reason_note(reason) {
                line.push_str(&format!(" ({note})"));
            }
        }
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    pub fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        if summary.all_passed() {
            writeln!(self.out)?;
            writeln!(self.out, "{SUCCESS_BANNER}")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn marker(&self, outcome: Outcome) -> String {
        match (outcome, self.color) {
            (Outcome::Pass, true) => "ok".green().to_string(),
            (Outcome::Pass, false) => "ok".to_string(),
            (Outcome::Fail, true) => "fault".red().to_string(),
            (Outcome::Fail, false) => "fault".to_string(),
        }
    }
}

fn pad_name(name: &str) -> String {
    format!("{name:<width$}", width = NAME_WIDTH)
}

fn pad_elapsed(ms: u64) -> String {
    format!("{ms:>width$}", width = ELAPSED_WIDTH)
}

fn reason_note(reason: &FailReason) -> Option<String> {
    match reason {
        FailReason::Mismatch => None,
        FailReason::FixtureMissing(path) => Some(format!("fixture missing: {}", file_label(path))),
        FailReason::FixtureUnreadable(path) => {
            Some(format!("fixture unreadable: {}", file_label(path)))
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::TestCase;

    fn result(name: &str, outcome: Outcome, ms: u64, reason: Option<FailReason>) -> CaseResult {
        CaseResult {
            case: TestCase::from_dir(Path::new(name)),
            outcome,
            elapsed_ms: ms,
            exit_status: Some(0),
            reason,
        }
    }

    fn render(results: Vec<CaseResult>) -> String {
        let mut reporter = Reporter::new(Vec::new(), false);
        for r in &results {
            reporter.case_line(r).unwrap();
        }
        let summary: RunSummary = results.into_iter().collect();
        reporter.finish(&summary).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn pass_line_layout() {
        let out = render(vec![result("case01", Outcome::Pass, 12, None)]);
        assert_eq!(out, "case01            12ms ... ok\n\nall ok!!\n");
    }

    #[test]
    fn failure_suppresses_banner() {
        let out = render(vec![
            result("case01", Outcome::Pass, 3, None),
            result("case02", Outcome::Fail, 1234, Some(FailReason::Mismatch)),
        ]);
        assert_eq!(
            out,
            "case01             3ms ... ok\ncase02          1234ms ... fault\n"
        );
    }

    #[test]
    fn empty_run_prints_only_banner() {
        assert_eq!(render(Vec::new()), "\nall ok!!\n");
    }

    #[test]
    fn long_values_are_not_truncated() {
        let out = render(vec![result(
            "case_with_a_long_name",
            Outcome::Pass,
            98765,
            None,
        )]);
        assert!(out.starts_with("case_with_a_long_name 98765ms ... ok\n"));
    }

    #[test]
    fn missing_fixture_is_named() {
        let out = render(vec![result(
            "case03",
            Outcome::Fail,
            0,
            Some(FailReason::FixtureMissing("case03/err.txt".into())),
        )]);
        assert_eq!(
            out,
            "case03             0ms ... fault (fixture missing: err.txt)\n"
        );
    }

    #[test]
    fn color_mode_emits_green_and_red_markers() {
        let mut reporter = Reporter::new(Vec::new(), true);
        reporter
            .case_line(&result("case01", Outcome::Pass, 1, None))
            .unwrap();
        reporter
            .case_line(&result("case02", Outcome::Fail, 1, Some(FailReason::Mismatch)))
            .unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].contains("\x1b[32mok"), "{:?}", lines[0]);
        assert!(lines[1].contains("\x1b[31mfault"), "{:?}", lines[1]);
    }

    #[test]
    fn plain_mode_has_no_escape_sequences() {
        let out = render(vec![
            result("case01", Outcome::Pass, 1, None),
            result("case02", Outcome::Fail, 1, Some(FailReason::Mismatch)),
        ]);
        assert!(!out.contains('\x1b'));
    }
}
