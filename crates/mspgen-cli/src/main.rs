//! # cryptogen entry point
//!
//! Parses the two positional arguments, reads the environment, sets up
//! logging, and runs the driver with the script-backed CA provider and
//! artifact generator.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mspgen_ca::ScriptCaProvider;
use mspgen_cli::{parse_override, run, DriverConfig, ScriptArtifactGenerator};

/// Provision certificate authorities and MSP directories for every
/// organization of a network topology.
#[derive(Parser, Debug)]
#[command(name = "cryptogen", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Topology description (YAML).
    config: PathBuf,

    /// `True` reissues every CA; any other value keeps existing material.
    #[arg(value_name = "OVERRIDE")]
    override_flag: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            // Nothing left to report to if the terminal is gone.
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let config = DriverConfig::from_env()?;
    tracing::debug!(
        gen_path = %config.gen_path.display(),
        scripts = %config.scripts_dir.display(),
        "configuration resolved"
    );

    let provider = ScriptCaProvider::new(&config.scripts_dir);
    let generator = ScriptArtifactGenerator::new(&config.artifact_generator);
    let mut stdout = std::io::stdout().lock();
    run(
        &cli.config,
        parse_override(&cli.override_flag),
        &config.layout(),
        &provider,
        &generator,
        &mut stdout,
    )?;
    Ok(())
}
