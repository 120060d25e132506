//! Golden-file harness for the `defiro` interpreter.
//!
//! Each `case*` directory holds `input.txt`, `out.txt` and `err.txt`. The
//! subject is run as `defiro <input.txt>` and both captured streams must match
//! the recorded files byte for byte.

pub mod compare;
pub mod config;
pub mod discovery;
pub mod error;
pub mod harness;
pub mod report;
pub mod runner;

pub use compare::{compare, Expected, Outcome};
pub use config::{ColorMode, HarnessConfig, Layout};
pub use discovery::{discover, TestCase};
pub use error::HarnessError;
pub use harness::{CaseResult, FailReason, Harness, RunSummary};
pub use report::Reporter;
pub use runner::{run_case, ExecutionResult};
