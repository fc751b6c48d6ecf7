//! @ai:module:intent CLI for the rideable benchmark harness driver
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ride_bench::{
    config::HarnessConfig,
    interrupt::run_interruptible,
    orchestrator::{Orchestrator, SessionOutcome, MISSING_ARTIFACT_MESSAGE},
    runner::SystemRunner,
    sweep::{RunMode, SweepError, SweepExecutor, SweepPlan, SweepReport, SweepTuple},
    TerminalConsole,
};
use ridespec::{OutputFormat, ParameterSet};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ride-bench")]
#[command(about = "Clean, build and sweep the rideable concurrency benchmark")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to ./ride-bench.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu and parameter prompts (the default)
    Interactive,

    /// Sweep without prompting
    Sweep {
        #[command(flatten)]
        axes: Axes,

        /// Run every tuple under the debugger
        #[arg(long)]
        debug: bool,
    },

    /// Print the invocations a sweep would make, without running anything
    Plan {
        #[command(flatten)]
        axes: Axes,

        /// Plan debugger-wrapped invocations
        #[arg(long)]
        debug: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "ride-bench.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct Axes {
    /// Rideable ids, e.g. "1,3,5-8"
    #[arg(short, long)]
    rideables: String,

    /// Test ids, e.g. "0~2"
    #[arg(short = 'm', long)]
    tests: String,

    /// Thread counts, e.g. "1,2,4,8"
    #[arg(short, long)]
    threads: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ride_bench=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(cli.config),
        Commands::Sweep { axes, debug } => run_sweep(cli.config, axes, mode_for(debug)),
        Commands::Plan {
            axes,
            debug,
            format,
        } => print_plan(cli.config, axes, mode_for(debug), format.into()),
        Commands::Init { output, force } => init_config(output, force),
    }
}

fn mode_for(debug: bool) -> RunMode {
    if debug {
        RunMode::RunDebug
    } else {
        RunMode::Run
    }
}

/// @ai:intent Interactive session: menu, prompts, sweep
/// @ai:effects io, fs:write
fn run_interactive(config_path: Option<PathBuf>) -> Result<()> {
    let config = HarnessConfig::load_or_default(config_path.as_deref())?;

    let outcome = run_interruptible(move || {
        let orchestrator = Orchestrator::from_config(Arc::new(SystemRunner::new()), &config);
        let mut console = TerminalConsole::new();
        orchestrator.run(&mut console)
    })?;

    if let Some(SessionOutcome::Completed(report)) = outcome {
        print_summary(&report);
    }

    Ok(())
}

/// @ai:intent Parse all three axes strictly
/// @ai:effects pure
fn resolve_plan(axes: &Axes) -> Result<SweepPlan> {
    let rideables = ridespec::parse_strict(&axes.rideables).context("Invalid --rideables")?;
    let tests = ridespec::parse_strict(&axes.tests).context("Invalid --tests")?;
    let threads = ridespec::parse_strict(&axes.threads).context("Invalid --threads")?;

    Ok(SweepPlan::new(rideables, tests, threads))
}

/// @ai:intent Non-interactive sweep from command-line expressions
/// @ai:effects io, fs:write
fn run_sweep(config_path: Option<PathBuf>, axes: Axes, mode: RunMode) -> Result<()> {
    let config = HarnessConfig::load_or_default(config_path.as_deref())?;
    let plan = resolve_plan(&axes)?;

    tracing::info!(
        "Sweeping {} tuples: rideables [{}], tests [{}], threads [{}]",
        plan.len(),
        plan.rideables,
        plan.tests,
        plan.threads
    );

    let outcome = run_interruptible(move || {
        let executor = SweepExecutor::from_config(Arc::new(SystemRunner::new()), &config);
        match executor.execute(&plan, mode) {
            Ok(report) => Ok(Some(report)),
            Err(SweepError::MissingArtifact(_)) => {
                println!("{}", MISSING_ARTIFACT_MESSAGE);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    })?;

    if let Some(Some(report)) = outcome {
        print_summary(&report);
    }

    Ok(())
}

/// @ai:intent Planned sweep as printed by `plan`
#[derive(Serialize)]
struct PlanListing {
    mode: RunMode,
    tuples: Vec<SweepTuple>,
    commands: Vec<String>,
}

/// @ai:intent Print the ordered invocation list
/// @ai:effects io
fn print_plan(
    config_path: Option<PathBuf>,
    axes: Axes,
    mode: RunMode,
    format: OutputFormat,
) -> Result<()> {
    let config = HarnessConfig::load_or_default(config_path.as_deref())?;
    let plan = resolve_plan(&axes)?;

    if mode == RunMode::RunDebug && !config.debugger.enabled {
        return Err(SweepError::DebuggerDisabled.into());
    }

    let executor = SweepExecutor::from_config(Arc::new(SystemRunner::new()), &config);

    match format {
        OutputFormat::Text => {
            for tuple in plan.tuples() {
                println!("{}", executor.invocation(tuple, mode));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            if plan.len() > ParameterSet::MAX_LEN {
                anyhow::bail!(
                    "{} tuples is too many to list as JSON (limit {})",
                    plan.len(),
                    ParameterSet::MAX_LEN
                );
            }

            let listing = PlanListing {
                mode,
                tuples: plan.tuples().collect(),
                commands: executor
                    .plan_invocations(&plan, mode)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            };
            let pretty = matches!(format, OutputFormat::JsonPretty);
            println!("{}", ridespec::to_json(&listing, pretty));
        }
    }

    Ok(())
}

/// @ai:intent Write the default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let config = HarnessConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Print sweep counts to console
/// @ai:effects io
fn print_summary(report: &SweepReport) {
    println!();
    println!(
        "Sweep complete: {} runs, {} failed, {} not started",
        report.attempted, report.failed, report.unstarted
    );
}
