//! Fuzz target for code verification.
//!
//! Tests that `CodeService::verify` never panics on arbitrary identities and codes, that
//! malformed codes are rejected without an error, and that issued codes always verify.

#![no_main]

use libfuzzer_sys::fuzz_target;

use pickup_core::{CodeConfig, CodeError, CodeService, ManualClock, SecretKey};

const KEY: &[u8] = b"fuzz-secret-key-0123456789abcdef";

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }

    let selector = data[0] % 2;
    let now = i64::from_le_bytes([
        data[1], data[2], data[3], data[4], data[5], data[6], data[7], data[8],
    ]);
    let payload = &data[9..];

    let Ok(secret) = SecretKey::new(KEY.to_vec()) else {
        return;
    };
    let Ok(service) =
        CodeService::new(secret, CodeConfig::default(), ManualClock::at_timestamp(now))
    else {
        return;
    };

    match selector {
        // Verify arbitrary (identity, code) pairs; must never panic
        0 => fuzz_verify_arbitrary(&service, payload),
        // Roundtrip: issue for a fuzzed identity, then verify it
        _ => fuzz_roundtrip(&service, payload),
    }
});

fn fuzz_verify_arbitrary(service: &CodeService<ManualClock>, data: &[u8]) {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let (identity, code) = s.split_once('\n').unwrap_or((s, ""));

    match service.verify(identity, code) {
        Ok(accepted) => {
            let well_formed = code.len() == 8 && code.bytes().all(|b| b.is_ascii_hexdigit());
            assert!(well_formed || !accepted, "malformed code accepted");
        },
        Err(CodeError::InvalidIdentity { .. }) => {},
        Err(other) => panic!("unexpected error from verify: {other}"),
    }
}

fn fuzz_roundtrip(service: &CodeService<ManualClock>, data: &[u8]) {
    let Ok(identity) = std::str::from_utf8(data) else {
        return;
    };

    match service.issue(identity) {
        Ok(code) => {
            assert_eq!(service.verify(identity, code.as_str()).ok(), Some(true));
            let lower = code.as_str().to_ascii_lowercase();
            assert_eq!(service.verify(identity, &lower).ok(), Some(true));
        },
        Err(CodeError::InvalidIdentity { .. }) => {
            assert!(service.verify(identity, "00000000").is_err());
        },
        Err(other) => panic!("unexpected error from issue: {other}"),
    }
}
