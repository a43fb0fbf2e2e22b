// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `cmdforge`: run a command interpreted, compile it to a standalone Rust
//! source file, or print a dry-run plan of what it would do — all against
//! a [`Program`] built by an external parser (stood in here by
//! [`demo::sample_program`]).

mod config;
mod demo;
mod error;
mod output;

use clap::{Parser, Subcommand};
use cmdforge_core::{CapturedEnvironment, ExecutionMode, PlanElement};
use cmdforge_engine::EngineDriver;
use config::Config;
use error::CliError;
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cmdforge", version, about = "Interpret, compile, or plan a command", long_about = None)]
struct Cli {
    /// Path to a cmdforge.toml config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command directly, inheriting stdin/stdout/stderr.
    Run { command: String },
    /// Compile a command to a standalone Rust source file.
    Generate {
        command: String,
        /// Write to this path instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print a side-effect-free plan of what a command would do.
    Plan {
        command: String,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("cmdforge: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let program = demo::sample_program();
    let env = CapturedEnvironment::capture();
    let driver = EngineDriver::new(&program, env);

    let command_name = match &cli.command {
        Commands::Run { command } | Commands::Generate { command, .. } | Commands::Plan { command, .. } => command,
    };
    if program.command(command_name).is_none() {
        return Err(CliError::UnknownCommand { name: command_name.clone() });
    }

    match cli.command {
        Commands::Run { command } => run_interpreter(&driver, &command, &config),
        Commands::Generate { command, out } => run_generator(&driver, &command, out.as_deref()),
        Commands::Plan { command, output } => run_plan(&driver, &command, output),
    }
}

fn run_interpreter(driver: &EngineDriver<'_>, command: &str, _config: &Config) -> Result<(), CliError> {
    let result = driver.run_command(command, ExecutionMode::Interpreter);
    if let Some(message) = result.error {
        return Err(CliError::ExecutionFailed {
            command: command.to_string(),
            message,
        });
    }
    Ok(())
}

fn run_generator(driver: &EngineDriver<'_>, command: &str, out: Option<&std::path::Path>) -> Result<(), CliError> {
    let result = driver.run_command(command, ExecutionMode::Generator);
    if let Some(message) = result.error {
        return Err(CliError::ExecutionFailed {
            command: command.to_string(),
            message,
        });
    }
    let source = result.text().unwrap_or_default();
    match out {
        Some(path) => std::fs::write(path, source).map_err(|source| CliError::OutputWrite {
            path: path.display().to_string(),
            source,
        }),
        None => {
            print!("{source}");
            Ok(())
        }
    }
}

fn run_plan(driver: &EngineDriver<'_>, command: &str, output: OutputFormat) -> Result<(), CliError> {
    let result = driver.run_command(command, ExecutionMode::Plan);
    if let Some(message) = result.error {
        return Err(CliError::ExecutionFailed {
            command: command.to_string(),
            message,
        });
    }
    let Some(plan) = result.plan() else {
        return Ok(());
    };
    render_plan(plan, output)
}

fn render_plan(plan: &PlanElement, output: OutputFormat) -> Result<(), CliError> {
    match output {
        OutputFormat::Text => {
            print!("{}", plan.render_text());
            Ok(())
        }
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(plan).map_err(|source| CliError::PlanSerialize { source })?;
            println!("{rendered}");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
