//! Fuzz target for `validate_filepath`.
//!
//! This fuzzer tests that:
//! 1. No input causes a panic, including non-Unicode bytes
//! 2. A path valid on `universal` has no forbidden characters anywhere
//!
//! Run with: `cargo +nightly fuzz run fuzz_validate_filepath`

#![no_main]

use libfuzzer_sys::fuzz_target;
use pathvet::{Platform, ValidationConfig};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    for platform in Platform::ALL {
        let config = ValidationConfig::for_platform(platform);
        let _ = pathvet::validate_filepath(&*text, &config);
    }

    let universal = ValidationConfig::for_platform(Platform::Universal);
    if pathvet::is_valid_filepath(&*text, &universal) {
        assert!(
            !text.chars().any(|c| (c.is_control() && c < ' ') || ":*?\"<>|".contains(c)),
            "forbidden character accepted in {text:?}"
        );
    }
});
