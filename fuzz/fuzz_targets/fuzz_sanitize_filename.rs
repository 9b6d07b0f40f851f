//! Fuzz target for `sanitize_filename`.
//!
//! This fuzzer tests that:
//! 1. No input causes a panic on any platform
//! 2. A non-empty sanitized name validates on the same platform
//! 3. The sanitized name never exceeds the configured byte limit
//! 4. Sanitizing the output again changes nothing
//!
//! Run with: `cargo +nightly fuzz run fuzz_sanitize_filename`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pathvet::{Platform, SanitizeOptions, ValidationConfig};

#[derive(Arbitrary, Debug)]
struct NameInput {
    name: String,
    platform: u8,
    max_len: u8,
    replacement: Option<char>,
}

fuzz_target!(|data: NameInput| {
    let platform = Platform::ALL[usize::from(data.platform) % Platform::ALL.len()];
    let Ok(config) = ValidationConfig::builder()
        .platform(platform)
        .max_name_len(usize::from(data.max_len))
        .build()
    else {
        return;
    };

    let mut options = SanitizeOptions::new();
    if let Some(c) = data.replacement {
        options = options.with_replacement_text(c.to_string());
    }

    let Ok(sanitized) = pathvet::sanitize_filename(data.name.as_str(), &config, &options) else {
        return;
    };

    // INVARIANT 1: length limit holds
    let bytes = config.fs_encoding().byte_len(&sanitized);
    assert!(
        bytes <= config.max_name_len(),
        "{bytes} bytes > {} for {:?}",
        config.max_name_len(),
        data.name
    );

    if matches!(sanitized.as_str(), "" | "." | "..") {
        return;
    }

    // INVARIANT 2: output validates
    if let Err(err) = pathvet::validate_filename(sanitized.as_str(), &config) {
        panic!("{:?} -> {sanitized:?} is invalid on {platform}: {err}", data.name);
    }

    // INVARIANT 3: idempotent
    let again = pathvet::sanitize_filename(sanitized.as_str(), &config, &options);
    assert_eq!(again.ok().as_deref(), Some(sanitized.as_str()));
});
