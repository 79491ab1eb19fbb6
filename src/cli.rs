//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing. Flag values are kept as raw
//! strings here and validated by the endpoint builders, so that a bad value
//! surfaces as a geteq error rather than a usage error.

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};

/// Real-time and historical USGS earthquake records from your terminal.
#[derive(Parser, Debug)]
#[command(name = "geteq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all log output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query the real-time summary feed
    #[command(visible_aliases = ["real", "rt"])]
    Realtime(RealtimeArgs),

    /// Query historical earthquake records from the FDSN event service
    Fdsn(FdsnArgs),

    /// Print the geteq version
    Version,
}

/// Arguments for the `realtime` command.
#[derive(Args, Debug)]
pub struct RealtimeArgs {
    /// Output format: table, json, csv
    #[arg(long, short = 'o', default_value = "table")]
    pub output: String,

    /// Magnitude bucket: all, 1.0, 2.5, 4.5, major
    #[arg(long, short = 'm', default_value = "major")]
    pub mag: String,

    /// Time window: hour, day, week, month
    #[arg(long, short = 't', default_value = "month")]
    pub time: String,
}

/// Arguments shared by every `fdsn` subcommand.
#[derive(Args, Debug)]
pub struct FdsnArgs {
    /// Magnitude: exact (4.5), bound (>4.5, <2), or range (4.0,6.0 or 4.0-6.0)
    #[arg(long, short = 'm', global = true, default_value = "", allow_hyphen_values = true)]
    pub magnitude: String,

    /// UTC time range START,END with YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS ends
    #[arg(long, short = 't', global = true, default_value = "")]
    pub time: String,

    /// Output format: table, json, geojson, csv, text
    #[arg(long, short = 'o', global = true, default_value = "table")]
    pub output: String,

    #[command(subcommand)]
    pub command: FdsnCommand,
}

/// FDSN operations.
#[derive(Subcommand, Debug)]
pub enum FdsnCommand {
    /// Run a record query
    #[command(visible_alias = "q")]
    Query(QueryArgs),
}

/// Arguments for `fdsn query`.
#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub event: Option<QueryCommand>,
}

/// Narrower lookups under `fdsn query`.
#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Detailed information about a single event given its event id
    #[command(visible_aliases = ["se", "e", "s"])]
    Event {
        /// Catalogue event id, e.g. ci40012345
        event_id: String,
    },
}

/// True for `--help` and `--version`, which clap reports as errors but
/// which should exit successfully.
#[must_use]
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_defaults() {
        let cli = Cli::try_parse_from(["geteq", "realtime"]).unwrap();
        let Command::Realtime(args) = cli.command else {
            panic!("expected realtime command");
        };
        assert_eq!(args.output, "table");
        assert_eq!(args.mag, "major");
        assert_eq!(args.time, "month");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_realtime_alias_and_flags() {
        let cli = Cli::try_parse_from(["geteq", "rt", "-o", "csv", "-m", "2.5", "-t", "day"]).unwrap();
        let Command::Realtime(args) = cli.command else {
            panic!("expected realtime command");
        };
        assert_eq!(args.output, "csv");
        assert_eq!(args.mag, "2.5");
        assert_eq!(args.time, "day");
    }

    #[test]
    fn test_fdsn_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "geteq", "fdsn", "q", "-m", "4.0-6.0", "-t", "2024-12-01,2024-12-02", "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Fdsn(args) = cli.command else {
            panic!("expected fdsn command");
        };
        assert_eq!(args.magnitude, "4.0-6.0");
        assert_eq!(args.time, "2024-12-01,2024-12-02");
        assert_eq!(args.output, "table");
        let FdsnCommand::Query(query) = args.command;
        assert!(query.event.is_none());
    }

    #[test]
    fn test_fdsn_event() {
        let cli = Cli::try_parse_from(["geteq", "fdsn", "-o", "text", "query", "e", "ci40012345"])
            .unwrap();
        let Command::Fdsn(args) = cli.command else {
            panic!("expected fdsn command");
        };
        assert_eq!(args.output, "text");
        let FdsnCommand::Query(query) = args.command;
        let Some(QueryCommand::Event { event_id }) = query.event else {
            panic!("expected event subcommand");
        };
        assert_eq!(event_id, "ci40012345");
    }

    #[test]
    fn test_version_command() {
        let cli = Cli::try_parse_from(["geteq", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn test_event_requires_id() {
        assert!(Cli::try_parse_from(["geteq", "fdsn", "query", "event"]).is_err());
    }

    #[test]
    fn test_help_and_version_are_informational() {
        for argv in [
            &["geteq", "--help"][..],
            &["geteq", "fdsn", "query", "--help"],
            &["geteq", "--version"],
        ] {
            let err = Cli::try_parse_from(argv).unwrap_err();
            assert!(is_informational(&err), "{argv:?}");
        }
    }

    #[test]
    fn test_usage_errors_are_not_informational() {
        for argv in [
            &["geteq", "bogus"][..],
            &["geteq"],
            &["geteq", "realtime", "--nope"],
            &["geteq", "fdsn", "query", "event"],
        ] {
            let err = Cli::try_parse_from(argv).unwrap_err();
            assert!(!is_informational(&err), "{argv:?}");
        }
    }
}
