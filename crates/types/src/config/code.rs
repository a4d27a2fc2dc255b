//! Code window configuration: bucket width and accepted bucket offsets.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default bucket width: 10 minutes.
const DEFAULT_BUCKET: Duration = Duration::from_secs(600);

/// Maximum bucket width: one day.
const MAX_BUCKET: Duration = Duration::from_secs(24 * 60 * 60);

/// Furthest past bucket a window may reach back to.
pub const MAX_STALE_BUCKETS: i64 = 16;

fn default_bucket() -> Duration {
    DEFAULT_BUCKET
}

fn default_window_offsets() -> Vec<i64> {
    vec![0, -1]
}

/// Time window configuration for issuing and verifying pickup codes.
///
/// A code is derived from the bucket containing the issue time. Verification recomputes
/// the code for the current bucket shifted by each entry of `window_offsets` and accepts
/// a match against any of them. With the defaults (`10m`, `[0, -1]`) a code stays valid
/// for 10 to 20 minutes depending on where in its bucket it was issued.
///
/// The secret key is deliberately not part of this struct; it is never serialized.
///
/// # Validation Rules
///
/// - `bucket` must be a whole number of seconds between 1s and 1 day
/// - `window_offsets` must be non-empty, contain `0`, contain no duplicates, and contain only
///   values in `-16..=0` (future buckets are never accepted)
///
/// # Example
///
/// ```no_run
/// # use std::time::Duration;
/// # use pickup_types::config::CodeConfig;
/// let config = CodeConfig::builder()
///     .bucket(Duration::from_secs(3600))
///     .window_offsets(vec![0, -1])
///     .build()
///     .expect("valid code config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CodeConfig {
    /// Width of one time bucket (e.g. "10m", "1h").
    #[serde(default = "default_bucket")]
    #[serde(with = "super::humantime_serde")]
    #[schemars(with = "String")]
    pub bucket: Duration,
    /// Bucket offsets accepted during verification, relative to the current bucket.
    #[serde(default = "default_window_offsets")]
    pub window_offsets: Vec<i64>,
}

#[bon::bon]
impl CodeConfig {
    /// Creates a new code configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any rule in the type docs is violated.
    #[builder]
    pub fn new(
        #[builder(default = default_bucket())] bucket: Duration,
        #[builder(default = default_window_offsets())] window_offsets: Vec<i64>,
    ) -> Result<Self, ConfigError> {
        let config = Self { bucket, window_offsets };
        config.validate()?;
        Ok(config)
    }
}

impl CodeConfig {
    /// Validates the configuration values.
    ///
    /// Call after deserialization to ensure values are within valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.subsec_nanos() != 0 {
            return Err(ConfigError::Validation {
                message: format!(
                    "bucket must be a whole number of seconds, got {}",
                    humantime::format_duration(self.bucket)
                ),
            });
        }
        if self.bucket < Duration::from_secs(1) || self.bucket > MAX_BUCKET {
            return Err(ConfigError::Validation {
                message: format!(
                    "bucket must be between 1s and 1day, got {}",
                    humantime::format_duration(self.bucket)
                ),
            });
        }
        if self.window_offsets.is_empty() {
            return Err(ConfigError::Validation {
                message: "window_offsets must not be empty".to_string(),
            });
        }
        if !self.window_offsets.contains(&0) {
            return Err(ConfigError::Validation {
                message: "window_offsets must contain 0 (the current bucket)".to_string(),
            });
        }
        if let Some(bad) =
            self.window_offsets.iter().find(|o| !(-MAX_STALE_BUCKETS..=0).contains(*o))
        {
            return Err(ConfigError::Validation {
                message: format!(
                    "window_offsets entries must be in -{MAX_STALE_BUCKETS}..=0, got {bad}"
                ),
            });
        }
        let mut sorted = self.window_offsets.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ConfigError::Validation {
                message: "window_offsets must not contain duplicates".to_string(),
            });
        }
        Ok(())
    }

    /// Bucket width in whole seconds.
    #[must_use]
    pub fn bucket_seconds(&self) -> u64 {
        self.bucket.as_secs()
    }

    /// Number of past buckets the window reaches back.
    #[must_use]
    pub fn max_staleness(&self) -> u64 {
        self.window_offsets.iter().min().map_or(0, |o| o.unsigned_abs())
    }

    /// Longest time a code can remain valid after it was issued.
    ///
    /// A code issued at the very start of its bucket survives the whole bucket plus every
    /// stale bucket in the window.
    #[must_use]
    pub fn validity_window(&self) -> Duration {
        let buckets = u32::try_from(self.max_staleness().saturating_add(1)).unwrap_or(u32::MAX);
        self.bucket.saturating_mul(buckets)
    }
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self { bucket: default_bucket(), window_offsets: default_window_offsets() }
    }
}
