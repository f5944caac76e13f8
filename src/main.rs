//! Payload generator for annotated variant calls

pub mod common;
pub mod err;
pub mod payload;

use std::process::{ExitCode, Termination};

use clap::{Parser, Subcommand};
use console::{Emoji, Term};

use crate::err::PayloadError;

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate submission payloads for annotated variant calls",
    long_about = "This tool renames annotated variant call files to their canonical names and \
                  builds the metadata payload that describes them"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Rename files and write the payload.
    Generate(payload::Args),
    /// Print descriptors of canonically named files.
    Describe(payload::describe::Args),
}

fn try_main(cli: &Cli) -> Result<(), anyhow::Error> {
    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    let term = Term::stderr();
    tracing::subscriber::with_default(collector, || {
        match &cli.command {
            Commands::Generate(args) => payload::run(&cli.common, args)?,
            Commands::Describe(args) => payload::describe::run(&cli.common, args)?,
        }

        Ok::<(), anyhow::Error>(())
    })?;
    term.write_line(&format!("All done. Have a nice day!{}", Emoji(" 😃", "")))?;

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            match err.downcast::<PayloadError>() {
                Ok(err) => err.report(),
                Err(_) => ExitCode::FAILURE,
            }
        }
    }
}
