//! spotitag CLI entry point

use clap::Parser;
use spotitag::config::{Cli, Settings};
use spotitag::pipeline;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: cannot create log file {}: {}", cli.log_file.display(), e);
        return ExitCode::FAILURE;
    }

    let input = match resolve_input(&cli) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Build settings from CLI
    let settings = match Settings::from_cli(&cli, input) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting run on {}", settings.input.display());

    // Run the pipeline
    match pipeline::run(&settings) {
        Ok(result) => {
            println!();
            println!(
                "Summary: {} tagged, {} not processed, {} skipped (of {} total)",
                result.tagged,
                result.non_processed.len(),
                result.unsupported,
                result.total_files
            );
            if let Some(report) = &result.report_path {
                println!("Files that could not be processed are listed in {}", report.display());
            }
        }
        Err(e) => {
            // Partial results are already on disk; the run itself ends normally
            error!("Batch aborted: {}", e);
            eprintln!("Batch aborted: {}", e);
        }
    }

    ExitCode::SUCCESS
}

/// Console output at the verbosity level plus a fresh run log per invocation
fn init_logging(cli: &Cli) -> io::Result<()> {
    let log_file = File::create(&cli.log_file)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().as_str().to_lowercase()));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let run_log = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .init();

    Ok(())
}

/// Take the input folder from the CLI, or ask for it once on stdin
fn resolve_input(cli: &Cli) -> io::Result<PathBuf> {
    if let Some(input) = &cli.input {
        return Ok(input.clone());
    }

    print!("Enter the folder path containing the tracks: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}
