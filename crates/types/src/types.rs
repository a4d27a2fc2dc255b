//! Value types shared by the pickup code crates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{CODE_TAG_BYTES, is_well_formed_code};

/// A fixed-width window of time: `floor(unix_seconds / bucket_seconds)`.
///
/// Buckets are recomputed on every call and never stored. The decimal rendering from
/// [`Display`](fmt::Display) is part of the MAC input, so it must stay a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeBucket(i64);

impl TimeBucket {
    /// Wraps a raw bucket index.
    #[must_use]
    pub const fn new(index: i64) -> Self {
        Self(index)
    }

    /// Returns the bucket containing `unix_seconds` for buckets `bucket_seconds` wide.
    ///
    /// Uses floor division, so instants before the epoch land in negative buckets rather
    /// than being rounded toward zero. A width of zero is treated as one second.
    #[must_use]
    pub fn from_timestamp(unix_seconds: i64, bucket_seconds: u64) -> Self {
        let width = i64::try_from(bucket_seconds).unwrap_or(i64::MAX).max(1);
        Self(unix_seconds.div_euclid(width))
    }

    /// Returns the raw bucket index.
    #[must_use]
    pub const fn index(self) -> i64 {
        self.0
    }

    /// Returns the bucket `delta` positions away, or `None` on overflow.
    #[must_use]
    pub fn offset(self, delta: i64) -> Option<Self> {
        self.0.checked_add(delta).map(Self)
    }

    /// Unix second at which this bucket begins (saturating).
    #[must_use]
    pub fn start(self, bucket_seconds: u64) -> i64 {
        let width = i64::try_from(bucket_seconds).unwrap_or(i64::MAX);
        self.0.saturating_mul(width)
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An issued pickup code: eight uppercase hex characters encoding four MAC bytes.
///
/// Codes are derived values and carry no identity of their own.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PickupCode(String);

impl PickupCode {
    /// Renders a truncated MAC tag as a code.
    #[must_use]
    pub fn from_tag(tag: [u8; CODE_TAG_BYTES]) -> Self {
        Self(hex::encode_upper(tag))
    }

    /// Decodes a presented code into its tag bytes.
    ///
    /// Returns `None` for anything that is not exactly eight hex digits. Upper and lower case
    /// decode to the same tag.
    #[must_use]
    pub fn parse_tag(code: &str) -> Option<[u8; CODE_TAG_BYTES]> {
        if !is_well_formed_code(code) {
            return None;
        }
        let mut tag = [0u8; CODE_TAG_BYTES];
        hex::decode_to_slice(code, &mut tag).ok()?;
        Some(tag)
    }

    /// Returns the code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the tag bytes this code encodes.
    #[must_use]
    pub fn tag(&self) -> [u8; CODE_TAG_BYTES] {
        // Constructed only from a tag or a validated string, so decoding cannot fail.
        Self::parse_tag(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for PickupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Codes are bearer values; keep them out of debug dumps.
impl fmt::Debug for PickupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PickupCode(********)")
    }
}

impl AsRef<str> for PickupCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for PickupCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for PickupCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match Self::parse_tag(&value) {
            Some(tag) => Ok(Self::from_tag(tag)),
            None => Err("pickup code must be 8 hex characters".to_string()),
        }
    }
}

impl From<PickupCode> for String {
    fn from(code: PickupCode) -> Self {
        code.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_from_timestamp_floors() {
        assert_eq!(TimeBucket::from_timestamp(0, 600), TimeBucket::new(0));
        assert_eq!(TimeBucket::from_timestamp(599, 600), TimeBucket::new(0));
        assert_eq!(TimeBucket::from_timestamp(600, 600), TimeBucket::new(1));
        assert_eq!(TimeBucket::from_timestamp(1_700_000_000, 600), TimeBucket::new(2_833_333));
    }

    #[test]
    fn test_bucket_before_epoch_is_negative() {
        assert_eq!(TimeBucket::from_timestamp(-1, 600), TimeBucket::new(-1));
        assert_eq!(TimeBucket::from_timestamp(-600, 600), TimeBucket::new(-1));
        assert_eq!(TimeBucket::from_timestamp(-601, 600), TimeBucket::new(-2));
    }

    #[test]
    fn test_bucket_zero_width_does_not_panic() {
        assert_eq!(TimeBucket::from_timestamp(42, 0), TimeBucket::new(42));
    }

    #[test]
    fn test_bucket_offset_and_start() {
        let bucket = TimeBucket::new(10);
        assert_eq!(bucket.offset(-1), Some(TimeBucket::new(9)));
        assert_eq!(bucket.start(600), 6000);
        assert_eq!(TimeBucket::new(i64::MIN).offset(-1), None);
        assert_eq!(TimeBucket::new(i64::MAX).start(600), i64::MAX);
    }

    #[test]
    fn test_bucket_display_is_decimal() {
        assert_eq!(TimeBucket::new(2_833_333).to_string(), "2833333");
        assert_eq!(TimeBucket::new(-5).to_string(), "-5");
    }

    #[test]
    fn test_code_from_tag_is_uppercase_hex() {
        let code = PickupCode::from_tag([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(code.as_str(), "DEADBEEF");
        assert_eq!(code, "DEADBEEF");
        assert_eq!(code.tag(), [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_parse_tag_accepts_either_case() {
        assert_eq!(PickupCode::parse_tag("deadBEEF"), Some([0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(PickupCode::parse_tag("not8hex!"), None);
        assert_eq!(PickupCode::parse_tag("DEADBEEF00"), None);
    }

    #[test]
    fn test_debug_hides_code() {
        let code = PickupCode::from_tag([1, 2, 3, 4]);
        assert!(!format!("{code:?}").contains("01020304"));
    }

    #[test]
    fn test_code_serde_normalizes_and_validates() {
        let code: PickupCode = serde_json::from_str("\"deadbeef\"").unwrap();
        assert_eq!(code.as_str(), "DEADBEEF");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"DEADBEEF\"");
        assert!(serde_json::from_str::<PickupCode>("\"xyz\"").is_err());
    }
}
