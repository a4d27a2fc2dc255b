//! Core types, validation, and errors for pickup codes.
//!
//! This crate provides the foundational pieces shared by the issuing service and its tools:
//! - [`TimeBucket`] and [`PickupCode`] value types
//! - Identity and code validation
//! - Window configuration ([`config::CodeConfig`])
//! - Error types using snafu

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{CodeError, ErrorCode, Result};
pub use types::{PickupCode, TimeBucket};
pub use validation::{is_well_formed_code, validate_identity};
