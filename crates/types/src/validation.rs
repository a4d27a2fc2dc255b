//! Input validation for identities and presented codes.
//!
//! Both code operations run the same identity check before anything touches the MAC, so
//! the derivation input `identity:bucket` is always unambiguous and bounded.
//!
//! ## Character Whitelists
//!
//! - Identities: `[A-Za-z0-9_-]{3,20}`. The `:` separator can never appear inside an identity.
//! - Codes: `[A-Fa-f0-9]{8}`. Case is not significant when a code is checked.

use crate::error::{CodeError, InvalidIdentitySnafu};

/// Minimum identity length in characters.
pub const MIN_IDENTITY_LEN: usize = 3;

/// Maximum identity length in characters.
pub const MAX_IDENTITY_LEN: usize = 20;

/// Number of hex characters in a pickup code.
pub const CODE_LEN: usize = 8;

/// Number of MAC bytes a pickup code encodes.
pub const CODE_TAG_BYTES: usize = CODE_LEN / 2;

/// Validates an identity against the identity policy.
///
/// Identities must:
/// - Be non-empty
/// - Contain only `[A-Za-z0-9_-]`
/// - Be 3-20 characters long
///
/// # Errors
///
/// Returns [`CodeError::InvalidIdentity`] describing the first violated constraint.
pub fn validate_identity(identity: &str) -> Result<(), CodeError> {
    if identity.is_empty() {
        return InvalidIdentitySnafu { reason: "must not be empty" }.fail();
    }
    if let Some(pos) = identity.find(|c: char| !is_identity_char(c)) {
        return InvalidIdentitySnafu {
            reason: format!(
                "contains invalid character {:?} at byte offset {}; allowed: [A-Za-z0-9_-]",
                identity[pos..].chars().next().unwrap_or('\0'),
                pos
            ),
        }
        .fail();
    }
    // Every accepted character is ASCII, so byte length equals character count here.
    if !(MIN_IDENTITY_LEN..=MAX_IDENTITY_LEN).contains(&identity.len()) {
        return InvalidIdentitySnafu {
            reason: format!(
                "length {} is outside {}-{} characters",
                identity.len(),
                MIN_IDENTITY_LEN,
                MAX_IDENTITY_LEN
            ),
        }
        .fail();
    }
    Ok(())
}

/// Returns `true` if `c` may appear in an identity.
#[inline]
pub fn is_identity_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Returns `true` if `code` is structurally a pickup code: exactly eight hex digits.
///
/// This is a shape check only; it says nothing about whether the code was issued.
#[inline]
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_hexdigit())
}
