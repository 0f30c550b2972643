//! demoqa-run: end-to-end suites for demoqa.com
//!
//! ## Usage
//!
//! ```bash
//! demoqa-run run                          # Desktop browser suites
//! demoqa-run run --suite api              # BookStore API flow
//! demoqa-run run --suite all --bail 1     # Everything, stop at first failure
//! demoqa-run run --filter "Slider"        # Only matching tests
//! demoqa-run list                         # Suites and test cases
//! demoqa-run config --profile api         # Effective configuration
//! ```

use clap::Parser;
use demoqa_cli::{
    parse_selection, render_config, render_list, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands,
    TestRunner, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            let mut runner = TestRunner::new(config);
            let summary = runtime.block_on(runner.run(&args))?;
            if summary.all_passed() {
                Ok(())
            } else {
                Err(CliError::test_execution(format!(
                    "{} of {} tests failed",
                    summary.failed,
                    summary.passed + summary.failed + summary.skipped
                )))
            }
        }
        Commands::List(args) => {
            let selection = parse_selection(&args.suite)?;
            print!("{}", render_list(&selection));
            Ok(())
        }
        Commands::Config(args) => {
            print!("{}", render_config(&args)?);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`/`-q`
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
