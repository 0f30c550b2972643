//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// demoqa-run: end-to-end suites for the DemoQA practice site
#[derive(Parser, Debug)]
#[command(name = "demoqa-run")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (failures and summary only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run suites against the site
    Run(RunArgs),

    /// List suites and their test cases
    List(ListArgs),

    /// Print the effective configuration as YAML
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suites to run: desktop, api, all, or part of a suite name
    #[arg(short, long, default_value = "desktop")]
    pub suite: String,

    /// Only run tests whose "<suite> <test>" title contains this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Config file (defaults to ./demoqa.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Override the application base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Stop after this many failures (0 = run everything)
    #[arg(long)]
    pub bail: Option<usize>,

    /// Per-test timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Directory for JUnit XML reports
    #[arg(long)]
    pub junit_dir: Option<PathBuf>,

    /// Directory for screenshots and page sources
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Suites to list: desktop, api, all, or part of a suite name
    #[arg(short, long, default_value = "all")]
    pub suite: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config file (defaults to ./demoqa.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Profile whose defaults apply when no file is found
    #[arg(short, long, default_value = "desktop")]
    pub profile: ProfileArg,
}

/// Profile argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileArg {
    /// Desktop browser suites
    #[default]
    Desktop,
    /// BookStore API suite
    Api,
}

impl From<ProfileArg> for demoqa::Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Desktop => Self::Desktop,
            ProfileArg::Api => Self::Api,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_run_defaults() {
            let cli = Cli::try_parse_from(["demoqa-run", "run"]).unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.suite, "desktop");
            assert!(args.filter.is_none());
            assert!(!args.headed);
            assert!(args.bail.is_none());
        }

        #[test]
        fn test_run_with_flags() {
            let cli = Cli::try_parse_from([
                "demoqa-run",
                "-vv",
                "run",
                "--suite",
                "api",
                "--filter",
                "delete",
                "--headed",
                "--base-url",
                "http://localhost:8080/",
                "--bail",
                "2",
                "--junit-dir",
                "out/junit",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.suite, "api");
            assert_eq!(args.filter.as_deref(), Some("delete"));
            assert!(args.headed);
            assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080/"));
            assert_eq!(args.bail, Some(2));
            assert_eq!(args.junit_dir, Some(PathBuf::from("out/junit")));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from(["demoqa-run", "list", "-q", "--color", "never"]).unwrap();
            assert!(cli.quiet);
            assert_eq!(cli.color, ColorArg::Never);
        }

        #[test]
        fn test_config_profile() {
            let cli = Cli::try_parse_from(["demoqa-run", "config", "--profile", "api"]).unwrap();
            let Commands::Config(args) = cli.command else {
                panic!("expected config");
            };
            assert_eq!(demoqa::Profile::from(args.profile), demoqa::Profile::Api);
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["demoqa-run"]).is_err());
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_color_arg() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}
