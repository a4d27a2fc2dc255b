//! Proptest strategies for pickup code domain values.
//!
//! Reusable generators for property-based testing across crates. Strategies produce
//! well-formed identities and instants as well as the malformed inputs callers are
//! expected to hand the service.
//!
//! # Usage
//!
//! ```no_run
//! use pickup_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(identity in strategies::arb_identity()) {
//!         // test invariant with a randomly generated identity
//!     }
//! }
//! ```

use pickup_types::validation::{MAX_IDENTITY_LEN, MIN_IDENTITY_LEN};
use proptest::prelude::*;

/// Generates an identity accepted by the identity policy: `[A-Za-z0-9_-]{3,20}`.
pub fn arb_identity() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{3,20}"
}

/// Generates a pair of distinct valid identities.
pub fn arb_distinct_identities() -> impl Strategy<Value = (String, String)> {
    (arb_identity(), arb_identity()).prop_filter("identities must differ", |(a, b)| a != b)
}

/// Generates an identity the policy rejects.
///
/// Covers: empty, too short, too long, and an otherwise valid identity with one
/// disallowed character (separator, whitespace, punctuation, or non-ASCII) spliced in.
pub fn arb_invalid_identity() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z0-9_-]{1,2}",
        "[A-Za-z0-9_-]{21,40}",
        (
            "[A-Za-z0-9_-]{3,19}",
            prop::sample::select(vec![':', ' ', '\n', '.', '/', '@', 'á', 'ß', '🦀']),
            any::<prop::sample::Index>(),
        )
            .prop_map(|(base, bad, index)| {
                let mut chars: Vec<char> = base.chars().collect();
                let at = index.index(chars.len() + 1);
                chars.insert(at, bad);
                chars.into_iter().collect()
            }),
    ]
    .prop_filter("length bounds are checked on ASCII input", |id| {
        !(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && (MIN_IDENTITY_LEN..=MAX_IDENTITY_LEN).contains(&id.len()))
    })
}

/// Generates a string that is not eight hex digits.
pub fn arb_malformed_code() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Fa-f0-9]{0,7}",
        "[A-Fa-f0-9]{9,16}",
        "[A-Fa-f0-9]{0,7}[g-zG-Z!# -]{1}[A-Fa-f0-9]{0,7}",
        ".{0,12}",
    ]
    .prop_filter("must not be a well-formed code", |code| {
        !(code.len() == 8 && code.bytes().all(|b| b.is_ascii_hexdigit()))
    })
}

/// Generates a well-formed (but almost certainly not issued) code.
pub fn arb_well_formed_code() -> impl Strategy<Value = String> {
    "[A-Fa-f0-9]{8}"
}

/// Generates a unix timestamp between 1970 and roughly 2100.
pub fn arb_timestamp() -> impl Strategy<Value = i64> {
    0i64..4_102_444_800
}
