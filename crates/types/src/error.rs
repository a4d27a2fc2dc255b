//! Error types for pickup codes using snafu.
//!
//! Only two kinds of failure exist:
//! - Caller errors: the identity does not satisfy the identity policy.
//! - Misconfiguration: the secret key or bucket window is unusable, detected when the service is
//!   constructed so a misconfigured process never issues a code.
//!
//! A malformed or wrong code is deliberately *not* an error; verification reports it as a
//! negative result.
//!
//! Each error variant maps to an [`ErrorCode`] with a unique numeric identifier.

use core::fmt;

use snafu::Snafu;

use crate::config::ConfigError;

/// Unified result type for pickup code operations.
pub type Result<T, E = CodeError> = std::result::Result<T, E>;

/// Machine-readable error codes for programmatic error handling.
///
/// | Range     | Domain        | Examples                          |
/// |-----------|---------------|-----------------------------------|
/// | 1000–1099 | Caller input  | Identity fails the policy         |
/// | 2000–2099 | Configuration | Missing or weak secret, bad window |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// Identity failed the charset/length policy.
    InvalidIdentity = 1000,
    /// Secret key was not provided or is empty.
    MissingSecret = 2000,
    /// Secret key is shorter than the minimum length.
    WeakSecret = 2001,
    /// Bucket or window configuration is invalid.
    InvalidConfig = 2002,
}

impl ErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Converts a numeric code to an `ErrorCode`, returning `None` for unknown values.
    #[must_use]
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1000 => Some(Self::InvalidIdentity),
            2000 => Some(Self::MissingSecret),
            2001 => Some(Self::WeakSecret),
            2002 => Some(Self::InvalidConfig),
            _ => None,
        }
    }

    /// Whether an operation failing with this code may succeed if retried unchanged.
    ///
    /// Every computation here is pure, so nothing is retryable.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        false
    }

    /// Suggested recovery action.
    #[must_use]
    pub const fn suggested_action(self) -> &'static str {
        match self {
            Self::InvalidIdentity => "Use an identity of 3-20 characters from [A-Za-z0-9_-]",
            Self::MissingSecret => "Provide the secret key through the configured source",
            Self::WeakSecret => "Provide a secret key of at least 16 bytes",
            Self::InvalidConfig => "Fix the bucket or window configuration and restart",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Errors raised by pickup code operations and service construction.
///
/// No variant carries secret key material.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CodeError {
    /// The identity failed the charset/length policy.
    ///
    /// **Recovery**: Not retryable. The caller must supply a well-formed identity;
    /// identities are never corrected silently.
    #[snafu(display("invalid identity: {reason}"))]
    InvalidIdentity {
        /// The violated constraint.
        reason: String,
    },

    /// The secret key source is absent or empty.
    #[snafu(display("secret key {name} is missing or empty"))]
    MissingSecret {
        /// Name of the secret source (for example an environment variable).
        name: String,
    },

    /// The secret key is too short to key the MAC safely.
    #[snafu(display("secret key is {len} bytes, at least {min} required"))]
    WeakSecret {
        /// Provided key length in bytes.
        len: usize,
        /// Minimum accepted length in bytes.
        min: usize,
    },

    /// Bucket or window configuration is invalid.
    #[snafu(display("{source}"))]
    Config {
        /// Underlying validation failure.
        source: ConfigError,
    },
}

impl CodeError {
    /// Returns the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidIdentity { .. } => ErrorCode::InvalidIdentity,
            Self::MissingSecret { .. } => ErrorCode::MissingSecret,
            Self::WeakSecret { .. } => ErrorCode::WeakSecret,
            Self::Config { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Whether this error is retryable. Delegates to [`ErrorCode::is_retryable`].
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }
}

impl From<ConfigError> for CodeError {
    fn from(source: ConfigError) -> Self {
        Self::Config { source }
    }
}
