//! axmake: configure and drive the unikernel build.
//!
//! Reads build options from the environment, resolves them into one
//! configuration and runs the matching make target with `AX_*` variables set.

mod commands;
mod dispatch;
mod exec;
mod logger;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use axmake_config::options::parse_verbosity;
use axmake_config::{HostProbe, Param, RawParameters, Resolver, SystemHost};

use commands::config::{self, ConfigFormat};
use exec::{DryRun, ProcessRunner, Runner};

#[derive(Parser)]
#[command(name = "axmake", version, about = "Build driver for ArceOS applications")]
struct Cli {
    /// Command to run (build, clean, disk_img, ...); defaults to $TARGET
    target: Option<String>,
    /// Workspace root (default: current directory)
    #[arg(short = 'C', long)]
    root: Option<PathBuf>,
    /// Print the resolved configuration instead of running a command
    #[arg(long, value_enum, value_name = "FMT")]
    print_config: Option<ConfigFormat>,
    /// Show what would run without running it
    #[arg(long)]
    dry_run: bool,
    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let params = RawParameters::from_env();

    let env_verbosity = parse_verbosity(params.get(Param::Verbose)).unwrap_or(0);
    logger::init(logger::level_for(cli.verbose.max(env_verbosity), cli.quiet));

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("reading current directory")?,
    };
    let target = cli
        .target
        .unwrap_or_else(|| params.get(Param::Target).to_string());

    let mut runner: Box<dyn Runner> = if cli.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(ProcessRunner)
    };
    drive(
        &root,
        &params,
        &target,
        &SystemHost,
        cli.print_config,
        runner.as_mut(),
    )
}

/// Resolve the configuration for `target`, then print or dispatch it.
fn drive(
    root: &Path,
    params: &RawParameters,
    target: &str,
    host: &dyn HostProbe,
    print_config: Option<ConfigFormat>,
    runner: &mut dyn Runner,
) -> Result<i32> {
    let cfg = Resolver::new(root, host)
        .resolve(params, target)
        .context("resolving build configuration")?;

    if let Some(format) = print_config {
        print!("{}", config::render(&cfg, format)?);
        return Ok(0);
    }
    dispatch::dispatch(target, &cfg, runner)
}
