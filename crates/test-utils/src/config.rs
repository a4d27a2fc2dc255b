//! Test configuration helpers.
//!
//! Provides fixed keys, configurations, and clocks for tests, centralizing
//! magic values that would otherwise be scattered across test modules.

// Fixtures are built from constants that are valid by construction.
#![allow(clippy::expect_used)]

use std::{sync::Arc, time::Duration};

use pickup_core::{CodeService, ManualClock, SecretKey};
use pickup_types::config::CodeConfig;

/// Secret used by [`test_secret_key`]. Only ever used in tests.
pub const TEST_SECRET: &[u8] = b"pickup-test-secret-key-0123456789";

/// A unix timestamp at the first second of a 600-second bucket.
pub const TEST_BUCKET_START: i64 = 1_700_001_000;

/// Returns a fixed secret key so codes are reproducible across test runs.
#[must_use]
pub fn test_secret_key() -> SecretKey {
    SecretKey::new(TEST_SECRET.to_vec()).expect("test secret satisfies the minimum length")
}

/// Returns the default window: 10-minute buckets, current and previous bucket accepted.
#[must_use]
pub fn test_code_config() -> CodeConfig {
    CodeConfig::default()
}

/// Returns a window with `bucket_secs`-wide buckets and the given offsets.
///
/// # Panics
///
/// Panics if the combination fails validation.
#[must_use]
pub fn test_code_config_with(bucket_secs: u64, window_offsets: Vec<i64>) -> CodeConfig {
    CodeConfig::builder()
        .bucket(Duration::from_secs(bucket_secs))
        .window_offsets(window_offsets)
        .build()
        .expect("test code config should be valid")
}

/// Builds a service over a shared [`ManualClock`] frozen at `unix_seconds`.
///
/// The returned clock handle moves time for the service.
#[must_use]
pub fn test_service_at(
    unix_seconds: i64,
    config: CodeConfig,
) -> (CodeService<Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_timestamp(unix_seconds));
    let service = CodeService::new(test_secret_key(), config, Arc::clone(&clock))
        .expect("test service should build");
    (service, clock)
}
