//! Pickup code issuance and verification.
//!
//! [`CodeService`] is stateless per call: every `issue` and `verify` samples the clock,
//! recomputes the bucket, and derives codes from the keyed MAC. Nothing is stored, so
//! codes cannot be revoked or consumed. A code verifies as many times as it is presented
//! until its bucket rolls out of the configured window.

use chrono::{DateTime, Utc};
use pickup_types::{
    CodeError, PickupCode, Result, TimeBucket, config::CodeConfig, validate_identity,
};
use subtle::Choice;
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, SystemClock},
    mac::CodeMac,
    secret::SecretKey,
};

/// Issues and verifies time-windowed pickup codes.
///
/// The service holds an immutable keyed MAC and a read-only clock, so it is `Send + Sync`
/// whenever the clock is and can be shared across threads without locking.
///
/// # Example
///
/// ```no_run
/// use pickup_core::{CodeService, SecretKey};
/// use pickup_types::config::CodeConfig;
///
/// let secret = SecretKey::from_env("PICKUP__SECRET_KEY")?;
/// let service = CodeService::with_system_clock(secret, CodeConfig::default())?;
///
/// let code = service.issue("S282539")?;
/// assert!(service.verify("S282539", code.as_str())?);
/// assert!(!service.verify("S282540", code.as_str())?);
/// # Ok::<(), pickup_types::CodeError>(())
/// ```
pub struct CodeService<C = SystemClock> {
    mac: CodeMac,
    config: CodeConfig,
    clock: C,
}

impl CodeService<SystemClock> {
    /// Creates a service reading the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Config`] if `config` fails validation.
    pub fn with_system_clock(secret: SecretKey, config: CodeConfig) -> Result<Self> {
        Self::new(secret, config, SystemClock)
    }
}

impl<C: Clock> CodeService<C> {
    /// Creates a service from an explicit secret, window configuration, and clock.
    ///
    /// The secret is consumed: the service keeps only the keyed MAC state, and the key
    /// bytes are wiped when `secret` drops at the end of this call.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Config`] if `config` fails validation.
    pub fn new(secret: SecretKey, config: CodeConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let mac = CodeMac::new(&secret)?;

        info!(
            bucket_secs = config.bucket_seconds(),
            window_offsets = ?config.window_offsets,
            validity_secs = config.validity_window().as_secs(),
            "Pickup code service ready"
        );

        Ok(Self { mac, config, clock })
    }

    /// Returns the window configuration.
    pub fn config(&self) -> &CodeConfig {
        &self.config
    }

    /// Returns the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the bucket containing the clock's current instant.
    pub fn current_bucket(&self) -> TimeBucket {
        TimeBucket::from_timestamp(self.clock.now().timestamp(), self.config.bucket_seconds())
    }

    /// Issues the code for `identity` in the current bucket.
    ///
    /// Repeated calls within one bucket return the same code, so a caller may redisplay
    /// a code without invalidating the one already handed out.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::InvalidIdentity`] if `identity` is not 3-20 characters of
    /// `[A-Za-z0-9_-]`.
    pub fn issue(&self, identity: &str) -> Result<PickupCode> {
        let bucket = self.current_bucket();
        let code = self.issue_for_bucket(identity, bucket)?;
        debug!(identity, %bucket, "Issued pickup code");
        Ok(code)
    }

    /// Issues the code `identity` would receive in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::InvalidIdentity`] if `identity` fails validation.
    pub fn issue_for_bucket(&self, identity: &str, bucket: TimeBucket) -> Result<PickupCode> {
        check_identity(identity)?;
        Ok(PickupCode::from_tag(self.mac.tag(identity, bucket)))
    }

    /// Checks whether `code` was issued for `identity` within the validity window.
    ///
    /// A `code` that is not exactly eight hex digits yields `Ok(false)`. Case is ignored.
    /// Every bucket in the window is checked with a constant-time comparison, and all of
    /// them are checked even after a match, so timing reveals neither how much of the code
    /// matched nor which bucket it came from. Wrong, expired, and cross-identity codes are
    /// indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::InvalidIdentity`] if `identity` fails validation.
    pub fn verify(&self, identity: &str, code: &str) -> Result<bool> {
        check_identity(identity)?;

        let Some(presented) = PickupCode::parse_tag(code) else {
            debug!(identity, code_len = code.len(), "Rejected malformed pickup code");
            return Ok(false);
        };

        let current = self.current_bucket();
        let mut matched = Choice::from(0u8);
        for &offset in &self.config.window_offsets {
            if let Some(bucket) = current.offset(offset) {
                matched |= self.mac.matches(identity, bucket, &presented);
            }
        }

        let accepted = bool::from(matched);
        debug!(identity, accepted, "Verified pickup code");
        Ok(accepted)
    }

    /// Returns the instant after which a code issued in `bucket` no longer verifies.
    pub fn valid_until(&self, bucket: TimeBucket) -> DateTime<Utc> {
        let staleness = i64::try_from(self.config.max_staleness()).unwrap_or(i64::MAX);
        let expiry_bucket = bucket
            .offset(staleness.saturating_add(1))
            .unwrap_or(TimeBucket::new(i64::MAX));
        let expiry = expiry_bucket.start(self.config.bucket_seconds());
        DateTime::from_timestamp(expiry, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Shared identity gate for every entry point.
fn check_identity(identity: &str) -> Result<()> {
    validate_identity(identity).inspect_err(|err| {
        if let CodeError::InvalidIdentity { reason } = err {
            warn!(reason = %reason, "Rejected invalid identity");
        }
    })
}
