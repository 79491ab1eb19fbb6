//! geteq - Real-time and historical USGS earthquake records from your terminal.
//!
//! Builds a request for either the real-time summary feed or the FDSN event
//! service, performs one GET, and prints the response as a table or verbatim.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

mod cli;
mod client;
mod endpoint;
mod errors;
mod filters;
mod models;
mod output;

use cli::{Cli, Command, FdsnCommand, QueryCommand};
use client::UsgsClient;
use endpoint::{QUERY_OPERATION, QueryUrl};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if cli::is_informational(&e) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Realtime(args) => cmd_realtime(&args),
        Command::Fdsn(args) => cmd_fdsn(&args),
        Command::Version => {
            cmd_version();
            Ok(())
        }
    }
}

/// Initialize tracing subscriber.
///
/// `RUST_LOG` takes precedence over the command-line verbosity flags.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the `realtime` command - fetch a summary feed.
fn cmd_realtime(args: &cli::RealtimeArgs) -> Result<()> {
    let query = endpoint::build_feed_url(&args.output, &args.mag, &args.time)?;
    fetch_and_print(&query)
}

/// Execute the `fdsn` commands - historical search or single event lookup.
fn cmd_fdsn(args: &cli::FdsnArgs) -> Result<()> {
    let FdsnCommand::Query(query_args) = &args.command;

    match &query_args.event {
        None => {
            let query = endpoint::build_search_url(
                QUERY_OPERATION,
                &args.output,
                &args.magnitude,
                &args.time,
            )?;
            fetch_and_print(&query)
        }
        Some(QueryCommand::Event { event_id }) => {
            let query = endpoint::build_single_event_url(QUERY_OPERATION, &args.output, event_id)?;
            fetch_and_print(&query)
        }
    }
}

/// Execute the `version` command.
fn cmd_version() {
    println!("geteq CLI v{}", env!("CARGO_PKG_VERSION"));
}

/// Perform the request and write the response to stdout.
fn fetch_and_print(query: &QueryUrl) -> Result<()> {
    let client = UsgsClient::new().context("failed to create USGS client")?;

    let body = client
        .fetch(query.url())
        .with_context(|| format!("failed to fetch {query}"))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    output::render_response(&mut handle, query, &body).context("failed to render response")?;

    handle.flush()?;
    Ok(())
}
