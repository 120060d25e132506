use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use defiro_tests::config::{resolve_subject, DEFAULT_BIN, DEFAULT_PATTERN};
use defiro_tests::runner::build_subject;
use defiro_tests::{ColorMode, Harness, HarnessConfig, Layout, Reporter};

#[derive(Parser, Debug)]
#[command(author, version, about = "defiro golden-file test harness", long_about = None)]
struct Cli {
    #[command(flatten)]
    discovery: DiscoveryArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct DiscoveryArgs {
    /// Directory searched for case directories (defaults to the harness crate)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Case directory name prefix
    #[arg(long, global = true, default_value = DEFAULT_PATTERN)]
    pattern: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the golden-file suite (default)
    Run(RunArgs),
    /// List discovered cases without running them
    List,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Subject binary; a bare name is looked up on PATH
    #[arg(long)]
    subject: Option<PathBuf>,
    /// Release artifact name under <project>/target/release
    #[arg(long)]
    bin: Option<String>,
    /// Pause before each case, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Only run cases whose name contains this filter
    #[arg(short, long)]
    filter: Option<String>,
    /// Print per-case execution details
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
    /// Skip `cargo build --release` in the subject project
    #[arg(long, default_value_t = false)]
    no_build: bool,
    /// Also run `cargo test` in the subject project before the suite
    #[arg(long, default_value_t = false)]
    unit_tests: bool,
    /// Exit non-zero when any case fails
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let layout = Layout::from_manifest_dir(Path::new(env!("CARGO_MANIFEST_DIR")))?;
    let root = cli
        .discovery
        .root
        .clone()
        .unwrap_or_else(|| layout.harness_dir.clone());

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run_suite(&layout, root, cli.discovery.pattern, args),
        Commands::List => list_cases(root, cli.discovery.pattern),
    }
}

fn run_suite(layout: &Layout, root: PathBuf, pattern: String, args: RunArgs) -> Result<()> {
    if !args.no_build {
        build_subject(&layout.project_dir, args.unit_tests)?;
    }
    let subject = match &args.subject {
        Some(arg) => resolve_subject(arg)?,
        None => layout.release_binary(args.bin.as_deref().unwrap_or(DEFAULT_BIN)),
    };

    let mut config = HarnessConfig::new(subject, root).with_delay_ms(args.delay_ms);
    config.pattern = pattern;
    config.filter = args.filter;
    config.verbose = args.verbose;

    let color = args.color.enabled();
    let mut reporter = Reporter::new(io::stdout().lock(), color);
    let summary = Harness::new(config).run(&mut reporter)?;

    if args.strict && !summary.all_passed() {
        bail!(
            "{} of {} cases failed",
            summary.failed(),
            summary.results.len()
        );
    }
    Ok(())
}

fn list_cases(root: PathBuf, pattern: String) -> Result<()> {
    let mut config = HarnessConfig::new(PathBuf::new(), root);
    config.pattern = pattern;
    for case in Harness::new(config).cases()? {
        println!("{:<15} {}", case.name, case.dir.display());
    }
    Ok(())
}
