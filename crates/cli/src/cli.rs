//! Command-line argument definitions.
//!
//! Uses clap derive macros with environment variable fallbacks. Global options apply to
//! every subcommand.

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use pickup_core::DEFAULT_SECRET_ENV;

/// Issue and verify time-windowed pickup codes.
#[derive(Debug, Parser)]
#[command(name = "pickup")]
#[command(version)]
#[command(about = "Issue and verify time-windowed pickup codes")]
#[command(long_about = "Issues short codes derived from an identity, the current time bucket, \
    and a secret key, and verifies them within a configurable window. The secret key is read \
    from an environment variable and is never accepted on the command line.")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by all subcommands.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// TOML file with the code window configuration.
    #[arg(long, env = "PICKUP__CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Bucket width, overriding the config file (e.g. "10m", "1h").
    #[arg(long, env = "PICKUP__BUCKET", global = true, value_parser = humantime::parse_duration)]
    pub bucket: Option<Duration>,

    /// Comma-separated bucket offsets accepted by verify, overriding the config file.
    #[arg(
        long,
        env = "PICKUP__WINDOW_OFFSETS",
        global = true,
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub window_offsets: Option<Vec<i64>>,

    /// Name of the environment variable holding the secret key.
    #[arg(long, global = true, default_value = DEFAULT_SECRET_ENV)]
    pub secret_key_env: String,

    /// Log output format.
    #[arg(
        long,
        env = "PICKUP__LOG_FORMAT",
        global = true,
        value_enum,
        default_value_t = LogFormat::Auto
    )]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// JSON when stderr is not a terminal, text otherwise.
    Auto,
    /// One JSON object per event.
    Json,
    /// Human-readable text.
    Text,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current code for each identity.
    ///
    /// With one identity only the code is printed; with several, each line is
    /// "<identity> <code>".
    Issue {
        /// Identities to issue codes for (3-20 characters of [A-Za-z0-9_-]).
        #[arg(required = true)]
        identities: Vec<String>,
    },

    /// Check a presented code. Exits 0 if valid, 1 if not.
    Verify {
        /// Identity the code was issued for.
        identity: String,
        /// The presented code (eight hex digits, case-insensitive).
        code: String,
    },

    /// Inspect the configuration format.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config inspection commands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the JSON schema of the config file.
    Schema,
    /// Print a config file with every default filled in.
    Example,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue_multiple() {
        let cli = Cli::try_parse_from(["pickup", "issue", "S282539", "S282540"]).unwrap();
        match cli.command {
            Command::Issue { identities } => assert_eq!(identities, ["S282539", "S282540"]),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.global.secret_key_env, DEFAULT_SECRET_ENV);
    }

    #[test]
    fn test_issue_requires_identity() {
        assert!(Cli::try_parse_from(["pickup", "issue"]).is_err());
    }

    #[test]
    fn test_parse_verify_with_overrides() {
        let cli = Cli::try_parse_from([
            "pickup",
            "verify",
            "S282539",
            "1A2B3C4D",
            "--bucket",
            "1h",
            "--window-offsets",
            "0,-1,-2",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.global.bucket, Some(Duration::from_secs(3600)));
        assert_eq!(cli.global.window_offsets, Some(vec![0, -1, -2]));
        assert_eq!(cli.global.log_format, LogFormat::Json);
        match cli.command {
            Command::Verify { identity, code } => {
                assert_eq!(identity, "S282539");
                assert_eq!(code, "1A2B3C4D");
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_bucket_rejected_by_parser() {
        assert!(Cli::try_parse_from(["pickup", "issue", "abc", "--bucket", "soon"]).is_err());
    }

    #[test]
    fn test_parse_config_schema() {
        let cli = Cli::try_parse_from(["pickup", "config", "schema"]).unwrap();
        assert!(matches!(cli.command, Command::Config { action: ConfigAction::Schema }));
    }
}
