use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "qprobe CLI - Places TaqMan probes between externally designed primer pairs and ranks the resulting qPCR assays.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors; failed targets are still logged and listed in the report
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Maximum number of targets designed concurrently.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Design assays from primer pair proposals: place probes, score and rank.
    Design(DesignArgs),
    /// Re-evaluate existing primer pairs (and probes) against their templates.
    Evaluate(EvaluateArgs),
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Path to the JSON design request (targets with their primer pair proposals).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the JSON results. Results are written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Path to the JSON evaluation request (targets with existing primer pairs).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the JSON results. Results are written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Configuration sources shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Path to a configuration file in TOML format. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the number of ranked primer pairs kept per target.
    #[arg(short, long, value_name = "INT")]
    pub num_pairs: Option<usize>,

    /// Override the scoring policy (e.g., 'probe-aware', 'primer-only').
    #[arg(short, long, value_name = "NAME")]
    pub policy: Option<String>,

    /// Skip probe placement, overriding the config file.
    #[arg(long)]
    pub no_probes: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S primer.tm-opt=61
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
