//! CLI error type and exit statuses.

use std::path::PathBuf;

use pickup_types::{CodeError, ErrorCode, config::ConfigError};
use snafu::Snafu;

/// Exit status for success and for a code that verified.
pub const EXIT_OK: u8 = 0;

/// Exit status for a code that did not verify.
pub const EXIT_REJECTED: u8 = 1;

/// Exit status for an identity that fails validation.
pub const EXIT_INVALID_IDENTITY: u8 = 2;

/// Exit status for a missing secret or unusable configuration.
pub const EXIT_MISCONFIGURED: u8 = 3;

/// Errors surfaced by the `pickup` binary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("failed to read config file {}: {source}", path.display()))]
    ReadConfig { path: PathBuf, source: std::io::Error },

    #[snafu(display("failed to parse config file {}: {source}", path.display()))]
    ParseConfig { path: PathBuf, source: toml::de::Error },

    #[snafu(display("{source}"))]
    InvalidConfig { source: ConfigError },

    #[snafu(display("{source}"))]
    Code { source: CodeError },

    #[snafu(display("failed to render config schema: {source}"))]
    Schema { source: serde_json::Error },

    #[snafu(display("failed to render example config: {source}"))]
    Example { source: toml::ser::Error },

    #[snafu(display("failed to write output: {source}"))]
    Output { source: std::io::Error },
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            CliError::Code { source: CodeError::InvalidIdentity { .. } } => EXIT_INVALID_IDENTITY,
            _ => EXIT_MISCONFIGURED,
        }
    }

    /// Recovery hint for errors raised by the code service, with its numeric error code.
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::Code { source } => {
                let code = source.code();
                Some(format!("[{code}] {}", code.suggested_action()))
            },
            CliError::InvalidConfig { .. } => {
                let code = ErrorCode::InvalidConfig;
                Some(format!("[{code}] {}", code.suggested_action()))
            },
            _ => None,
        }
    }
}
