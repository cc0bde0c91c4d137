#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode};
use roadmap_core::ErrorCode;
use roadmap_core::config::{self, RoadmapConfig};
use std::env;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "roadmap: prerequisite graphs for learning roadmaps",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Check",
        about = "Check a roadmap for cycles and bad references",
        long_about = "Run the ingestion checks on a roadmap document without saving it.",
        after_help = "EXAMPLES:\n    # Validate a generated roadmap\n    roadmap validate rust.json\n\n    # Emit machine-readable output\n    roadmap validate rust.json --format json"
    )]
    Validate(cmd::validate::ValidateArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Print a valid learning order",
        long_about = "Print every concept in an order that respects all prerequisites.",
        after_help = "EXAMPLES:\n    # Show the learning path\n    roadmap path rust.json\n\n    # Pipe ids and names\n    roadmap path rust.json --format text | cut -f2"
    )]
    Path(cmd::path::PathArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Group concepts into parallel study layers",
        after_help = "EXAMPLES:\n    # Show layers\n    roadmap layers rust.json"
    )]
    Layers(cmd::path::LayersArgs),

    #[command(
        next_help_heading = "Progress",
        about = "Concepts one prerequisite away from unlocking",
        after_help = "EXAMPLES:\n    # Nothing mastered yet\n    roadmap frontier rust.json\n\n    # After mastering concepts 1 and 2\n    roadmap frontier rust.json --mastered 1,2"
    )]
    Frontier(cmd::progress::MasteryArgs),

    #[command(
        next_help_heading = "Progress",
        about = "Concepts whose prerequisites are all mastered",
        after_help = "EXAMPLES:\n    # After mastering concept 1\n    roadmap unlocked rust.json --mastered 1"
    )]
    Unlocked(cmd::progress::MasteryArgs),

    #[command(
        next_help_heading = "Progress",
        about = "Mastered, unlocked and frontier concepts together",
        after_help = "EXAMPLES:\n    # Progress report as JSON\n    roadmap progress rust.json --mastered 1,2 --json"
    )]
    Progress(cmd::progress::MasteryArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ROADMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "roadmap=debug,info"
        } else {
            "roadmap=info,warn"
        })
    });

    let format = env::var("ROADMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_project_config() -> anyhow::Result<RoadmapConfig> {
    let project_root = env::current_dir()?;
    config::load_config(&project_root)
}

fn run_command(
    command: &Commands,
    config: &RoadmapConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    match command {
        Commands::Validate(args) => cmd::validate::run_validate(args, &config.ingest, output),
        Commands::Path(args) => cmd::path::run_path(args, output),
        Commands::Layers(args) => cmd::path::run_layers(args, output),
        Commands::Frontier(args) => {
            cmd::progress::run_query(args, cmd::progress::Query::Frontier, output)
        }
        Commands::Unlocked(args) => {
            cmd::progress::run_query(args, cmd::progress::Query::Unlocked, output)
        }
        Commands::Progress(args) => cmd::progress::run_progress(args, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let (config, config_error) = match load_project_config() {
        Ok(config) => (config, None),
        Err(err) => (RoadmapConfig::default(), Some(err)),
    };
    let output =
        output::resolve_output_mode(cli.format, cli.json, config.output.format.as_deref());
    debug!(?output, "resolved output mode");

    let failure = match config_error {
        Some(err) => Some(CliError::from_code(
            ErrorCode::ConfigParseError,
            format!("{err:#}"),
        )),
        None => run_command(&cli.command, &config, output)
            .err()
            .map(|err| CliError::from_anyhow(&err)),
    };

    let Some(failure) = failure else {
        return ExitCode::SUCCESS;
    };
    if let Err(render_err) = output::render_error(output, &failure) {
        eprintln!("error: {} ({render_err})", failure.message);
    }
    ExitCode::FAILURE
}
