//! Keyed code derivation.
//!
//! A code is the first four bytes of `HMAC-SHA256(key, "{identity}:{bucket}")`, where
//! `bucket` is rendered as a decimal integer. Identities never contain `:`, so the input
//! is unambiguous. Only the keyed construction exists; without the key nobody can
//! compute a valid code even knowing the identity and the time.

use hmac::{Hmac, Mac};
use pickup_types::{
    TimeBucket,
    error::{CodeError, WeakSecretSnafu},
    validation::CODE_TAG_BYTES,
};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

use crate::secret::{MIN_SECRET_KEY_BYTES, SecretKey};

/// Separator between identity and bucket in the MAC input.
const INPUT_SEPARATOR: u8 = b':';

/// A keyed HMAC-SHA256 instance, cloned for every derivation.
///
/// The raw key is not retained; only the keyed MAC state is.
#[derive(Clone)]
pub(crate) struct CodeMac {
    mac: Hmac<Sha256>,
}

impl CodeMac {
    /// Keys a MAC with `secret`.
    pub(crate) fn new(secret: &SecretKey) -> Result<Self, CodeError> {
        // HMAC accepts keys of any length; the error arm is unreachable for a validated key.
        let mac = <Hmac<Sha256>>::new_from_slice(secret.expose())
            .map_err(|_| WeakSecretSnafu { len: secret.len(), min: MIN_SECRET_KEY_BYTES }.build())?;
        Ok(Self { mac })
    }

    /// Computes the truncated tag for `identity` in `bucket`.
    ///
    /// The caller is responsible for validating `identity` first.
    pub(crate) fn tag(&self, identity: &str, bucket: TimeBucket) -> [u8; CODE_TAG_BYTES] {
        let mut mac = self.mac.clone();
        mac.update(identity.as_bytes());
        mac.update(&[INPUT_SEPARATOR]);
        mac.update(bucket.to_string().as_bytes());
        let digest = mac.finalize().into_bytes();

        let mut tag = [0u8; CODE_TAG_BYTES];
        tag.copy_from_slice(&digest[..CODE_TAG_BYTES]);
        tag
    }

    /// Compares the expected tag for `bucket` against `presented` in constant time.
    pub(crate) fn matches(
        &self,
        identity: &str,
        bucket: TimeBucket,
        presented: &[u8; CODE_TAG_BYTES],
    ) -> Choice {
        let expected = self.tag(identity, bucket);
        expected[..].ct_eq(&presented[..])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_mac(key: &[u8]) -> CodeMac {
        CodeMac::new(&SecretKey::new(key.to_vec()).unwrap()).unwrap()
    }

    /// Computes the full HMAC over the formatted input to cross-check the streaming updates.
    fn reference_tag(key: &[u8], input: &str) -> [u8; CODE_TAG_BYTES] {
        let mut mac = <Hmac<Sha256>>::new_from_slice(key).unwrap();
        mac.update(input.as_bytes());
        let digest = mac.finalize().into_bytes();
        let mut tag = [0u8; CODE_TAG_BYTES];
        tag.copy_from_slice(&digest[..CODE_TAG_BYTES]);
        tag
    }

    #[test]
    fn test_tag_matches_formatted_input() {
        let key = b"SWAN_SECRET_2025";
        let mac = test_mac(key);
        let bucket = TimeBucket::new(2_833_333);
        assert_eq!(mac.tag("S282539", bucket), reference_tag(key, "S282539:2833333"));
    }

    #[test]
    fn test_tag_known_vector() {
        // RFC 4231 test case 2. "Jefe" is below the service minimum, so use the raw MAC.
        let mut mac = <Hmac<Sha256>>::new_from_slice(b"Jefe").unwrap();
        mac.update(b"what do ya want for nothing?");
        let digest = mac.finalize().into_bytes();
        assert_eq!(hex::encode(&digest[..CODE_TAG_BYTES]), "5bdcc146");
    }

    #[test]
    fn test_tag_depends_on_every_input() {
        let mac = test_mac(b"0123456789abcdef");
        let base = mac.tag("S282539", TimeBucket::new(100));
        assert_ne!(base, mac.tag("S282540", TimeBucket::new(100)));
        assert_ne!(base, mac.tag("S282539", TimeBucket::new(101)));

        let other = test_mac(b"fedcba9876543210");
        assert_ne!(base, other.tag("S282539", TimeBucket::new(100)));
    }

    #[test]
    fn test_tag_negative_bucket() {
        let key = b"0123456789abcdef";
        let mac = test_mac(key);
        assert_eq!(mac.tag("abc", TimeBucket::new(-3)), reference_tag(key, "abc:-3"));
    }

    #[test]
    fn test_matches_is_exact() {
        let mac = test_mac(b"0123456789abcdef");
        let bucket = TimeBucket::new(7);
        let tag = mac.tag("abc", bucket);
        assert!(bool::from(mac.matches("abc", bucket, &tag)));

        let mut flipped = tag;
        flipped[3] ^= 0x01;
        assert!(!bool::from(mac.matches("abc", bucket, &flipped)));
    }
}
