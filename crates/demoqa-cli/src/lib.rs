//! Command-line runner for the DemoQA suites.
//!
//! Resolves configuration (profile defaults, `demoqa.yaml`, environment,
//! flags), runs the selected suites with progress output and writes one
//! JUnit file per group.

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, ListArgs, ProfileArg, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{format_result, ProgressReporter};
pub use runner::{
    apply_overrides, parse_selection, render_config, render_list, resolve_config, suite_names, RunSummary,
    TestRunner,
};
