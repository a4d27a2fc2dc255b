//! Time-windowed keyed pickup codes.
//!
//! An 8-character code is derived from an identity, the current coarse time bucket, and a
//! secret key. A verifier holding the same key accepts the code for a short window without
//! storing anything. The crate provides:
//! - [`CodeService`]: `issue` and `verify`
//! - [`Clock`] with [`SystemClock`] and the test-friendly [`ManualClock`]
//! - [`SecretKey`]: the injected MAC key
//!
//! ## Properties callers rely on
//!
//! - Issuing twice in the same bucket yields the same code.
//! - A code verifies from the moment it is issued until its bucket leaves the window
//!   (10-20 minutes with the default 10-minute bucket and `[0, -1]` window).
//! - Verification is multi-use: there is no consumption or revocation state.
//! - Only the key holder can mint codes; identities and times are not secret.

#![deny(unsafe_code)]

mod clock;
mod mac;
mod secret;
mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pickup_types::{CodeError, PickupCode, Result, TimeBucket, config::CodeConfig};
pub use secret::{
    DEFAULT_SECRET_ENV, GENERATED_SECRET_KEY_BYTES, MIN_SECRET_KEY_BYTES, SecretKey,
};
pub use service::CodeService;
