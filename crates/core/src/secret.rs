//! The MAC key used to derive pickup codes.
//!
//! A [`SecretKey`] is loaded once at startup and handed to the service by value. It has no
//! `Display` or `Serialize` impl, redacts itself in `Debug`, and wipes its bytes on drop.
//! There is no built-in default key: a process without a configured secret cannot build a
//! service.

use std::fmt;

use pickup_types::error::{CodeError, MissingSecretSnafu, WeakSecretSnafu};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_KEY_BYTES: usize = 16;

/// Length of keys produced by [`SecretKey::generate`].
pub const GENERATED_SECRET_KEY_BYTES: usize = 32;

/// Environment variable the CLI reads the secret from by default.
pub const DEFAULT_SECRET_ENV: &str = "PICKUP__SECRET_KEY";

/// Secret MAC key bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Wraps raw key bytes.
    ///
    /// # Errors
    ///
    /// - [`CodeError::MissingSecret`] if `bytes` is empty.
    /// - [`CodeError::WeakSecret`] if `bytes` is shorter than [`MIN_SECRET_KEY_BYTES`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CodeError> {
        let mut bytes = bytes.into();
        if bytes.is_empty() {
            return MissingSecretSnafu { name: "secret key" }.fail();
        }
        if bytes.len() < MIN_SECRET_KEY_BYTES {
            let len = bytes.len();
            bytes.zeroize();
            return WeakSecretSnafu { len, min: MIN_SECRET_KEY_BYTES }.fail();
        }
        Ok(Self { bytes })
    }

    /// Reads the key from environment variable `var`, using the value's raw bytes.
    ///
    /// Values need not be UTF-8.
    ///
    /// # Errors
    ///
    /// - [`CodeError::MissingSecret`] if the variable is unset or empty.
    /// - [`CodeError::WeakSecret`] if the value is too short.
    pub fn from_env(var: &str) -> Result<Self, CodeError> {
        match std::env::var_os(var) {
            Some(value) if !value.is_empty() => Self::new(value.into_encoded_bytes()),
            _ => MissingSecretSnafu { name: var }.fail(),
        }
    }

    /// Generates a random key of [`GENERATED_SECRET_KEY_BYTES`] bytes.
    ///
    /// Codes issued with a generated key only verify within the same process.
    #[must_use]
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = vec![0u8; GENERATED_SECRET_KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`: empty keys are rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").field("len", &self.bytes.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        let err = SecretKey::new(Vec::new()).unwrap_err();
        assert!(matches!(err, CodeError::MissingSecret { .. }));
    }

    #[test]
    fn test_short_key_rejected() {
        let err = SecretKey::new(b"short".to_vec()).unwrap_err();
        assert!(matches!(err, CodeError::WeakSecret { len: 5, min: MIN_SECRET_KEY_BYTES }));
        assert!(!err.to_string().contains("short"), "error must not echo key bytes");
    }

    #[test]
    fn test_minimum_length_accepted() {
        let key = SecretKey::new(vec![7u8; MIN_SECRET_KEY_BYTES]).unwrap();
        assert_eq!(key.len(), MIN_SECRET_KEY_BYTES);
        assert!(!key.is_empty());
    }

    #[test]
    fn test_debug_redacts_bytes() {
        let key = SecretKey::new(b"super-secret-value-0123".to_vec()).unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("len: 23"));
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = SecretKey::generate();
        let b = SecretKey::generate();
        assert_eq!(a.len(), GENERATED_SECRET_KEY_BYTES);
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn test_from_env_missing_variable() {
        let err = SecretKey::from_env("PICKUP_TEST_SECRET_THAT_IS_NEVER_SET").unwrap_err();
        match err {
            CodeError::MissingSecret { name } => {
                assert_eq!(name, "PICKUP_TEST_SECRET_THAT_IS_NEVER_SET");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_accepts_non_utf8_bytes() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        const VAR: &str = "PICKUP_TEST_SECRET_NON_UTF8";
        let raw: &[u8] = b"\xff\xfenot-utf8-secret-bytes";
        std::env::set_var(VAR, OsStr::from_bytes(raw));
        let key = SecretKey::from_env(VAR);
        std::env::remove_var(VAR);

        let key = key.unwrap();
        assert_eq!(key.expose(), raw);
    }

    #[test]
    fn test_from_env_empty_value_is_missing() {
        const VAR: &str = "PICKUP_TEST_SECRET_EMPTY";
        std::env::set_var(VAR, "");
        let err = SecretKey::from_env(VAR).unwrap_err();
        std::env::remove_var(VAR);
        assert!(matches!(err, CodeError::MissingSecret { .. }));
    }
}
