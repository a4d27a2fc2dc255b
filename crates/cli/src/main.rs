//! Pickup code operator CLI.
//!
//! # Usage
//!
//! ```bash
//! export PICKUP__SECRET_KEY="$(openssl rand -hex 32)"
//!
//! # Print the current code
//! pickup issue S282539
//!
//! # Check a code (exit 0 valid, 1 invalid, 2 bad identity, 3 misconfigured)
//! pickup verify S282539 1A2B3C4D
//!
//! # One-hour buckets, accepting codes up to two buckets old
//! pickup --bucket 1h --window-offsets 0,-1,-2 issue S282539
//!
//! # Config file format
//! pickup config schema
//! pickup config example > pickup.toml
//! ```

#![deny(unsafe_code)]

mod cli;
mod config;
mod error;

use std::{
    io::{IsTerminal, Write},
    process::ExitCode,
};

use clap::Parser;
use cli::{Cli, Command, ConfigAction, GlobalOptions, LogFormat};
use error::{CliError, CodeSnafu, EXIT_OK, EXIT_REJECTED, OutputSnafu};
use pickup_core::{Clock, CodeService, SecretKey};
use snafu::ResultExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.global.log_format);

    let mut stdout = std::io::stdout().lock();
    match run(cli, &mut stdout) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(hint) = err.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.exit_status())
        },
    }
}

/// Runs one command, writing its output to `out`, and returns the exit status.
fn run(cli: Cli, out: &mut impl Write) -> Result<u8, CliError> {
    match cli.command {
        Command::Config { action } => {
            let rendered = match action {
                ConfigAction::Schema => config::code_config_schema()?,
                ConfigAction::Example => config::code_config_example()?,
            };
            out.write_all(rendered.as_bytes()).context(OutputSnafu)?;
            Ok(EXIT_OK)
        },
        Command::Issue { identities } => {
            let service = build_service(&cli.global)?;
            issue_codes(&service, &identities, out)
        },
        Command::Verify { identity, code } => {
            let service = build_service(&cli.global)?;
            verify_code(&service, &identity, &code, out)
        },
    }
}

/// Prints the code for each identity. Nothing is printed if any identity is invalid.
fn issue_codes<C: Clock>(
    service: &CodeService<C>,
    identities: &[String],
    out: &mut impl Write,
) -> Result<u8, CliError> {
    let codes = identities
        .iter()
        .map(|identity| service.issue(identity).context(CodeSnafu))
        .collect::<Result<Vec<_>, _>>()?;

    if let [code] = codes.as_slice() {
        writeln!(out, "{code}").context(OutputSnafu)?;
    } else {
        for (identity, code) in identities.iter().zip(&codes) {
            writeln!(out, "{identity} {code}").context(OutputSnafu)?;
        }
    }
    Ok(EXIT_OK)
}

/// Prints `valid` or `invalid` and returns the matching exit status.
fn verify_code<C: Clock>(
    service: &CodeService<C>,
    identity: &str,
    code: &str,
    out: &mut impl Write,
) -> Result<u8, CliError> {
    if service.verify(identity, code).context(CodeSnafu)? {
        writeln!(out, "valid").context(OutputSnafu)?;
        Ok(EXIT_OK)
    } else {
        writeln!(out, "invalid").context(OutputSnafu)?;
        Ok(EXIT_REJECTED)
    }
}

fn build_service(global: &GlobalOptions) -> Result<CodeService, CliError> {
    let config = config::load_code_config(
        global.config.as_deref(),
        global.bucket,
        global.window_offsets.clone(),
    )?;
    tracing::debug!(
        config_file = ?global.config,
        secret_key_env = %global.secret_key_env,
        "Loaded code config"
    );
    let secret = SecretKey::from_env(&global.secret_key_env).context(CodeSnafu)?;
    CodeService::with_system_clock(secret, config).context(CodeSnafu)
}

/// Initializes the logging system.
///
/// Events go to stderr so stdout carries only command output. Supports three formats:
/// - `Text`: Human-readable format (development)
/// - `Json`: JSON structured logging (production)
/// - `Auto`: JSON for non-TTY stderr, text otherwise
fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stderr().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
