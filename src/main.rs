use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use cxx_tooling::{
    execute, plan, Dispatcher, DryRunner, Operation, ProcessRunner, Report, Settings,
    ToolingError,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run clang-format, cmake-format and clang-tidy over every C++ project in the repository",
    long_about = None
)]
struct Args {
    /// Config file (defaults to ./tooling.toml, then the built-in defaults)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log every command line that is run
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Show the commands that would be run, but don't execute them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Format C/C++ sources with clang-format and CMake files with cmake-format
    Format,
    /// Statically analyze C/C++ sources with clang-tidy
    Lint,
}

impl From<Commands> for Operation {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Format => Operation::Format,
            Commands::Lint => Operation::Lint,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let settings =
        Settings::load(args.config.as_deref()).context("Failed to load tooling configuration")?;

    let runs = plan(&settings, args.command.into()).context("Failed to collect files")?;

    Report::new(&runs)
        .print()
        .context("Failed to write report")?;

    let invocations = if args.dry_run {
        execute(&runs, &mut Dispatcher::new(DryRunner::new(io::stdout())))?
    } else {
        execute(&runs, &mut Dispatcher::new(ProcessRunner))?
    };

    info!(invocations, "Done");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            // Mirror the failing tool's exit status
            let code = err
                .downcast_ref::<ToolingError>()
                .map_or(1, ToolingError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
