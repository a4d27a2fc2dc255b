//! Shared test utilities for pickup code crates.
//!
//! This crate provides common test helpers to reduce boilerplate across test modules:
//!
//! - [`strategies`] - Proptest generators for identities, codes, and timestamps
//! - [`test_secret_key`] - Fixed secret key for reproducible codes
//! - [`test_code_config`] - Default window configuration for tests
//! - [`test_service_at`] - Service over a manually driven clock

#![deny(unsafe_code)]

pub mod strategies;

mod config;
pub use config::{
    TEST_BUCKET_START, TEST_SECRET, test_code_config, test_code_config_with, test_secret_key,
    test_service_at,
};
