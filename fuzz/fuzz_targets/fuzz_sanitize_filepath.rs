//! Fuzz target for `sanitize_filepath`.
//!
//! This fuzzer tests that:
//! 1. No input causes a panic on any platform
//! 2. Absolute-path errors are reported, never repaired
//! 3. Every segment of a sanitized path is a valid filename
//!
//! Run with: `cargo +nightly fuzz run fuzz_sanitize_filepath`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pathvet::validator::split_drive;
use pathvet::{ErrorReason, Platform, SanitizeOptions, ValidationConfig};

#[derive(Arbitrary, Debug)]
struct PathInput {
    segments: Vec<String>,
    platform: u8,
    rooted: bool,
    normalize: bool,
}

impl PathInput {
    fn build(&self) -> String {
        let joined = self.segments.join("/");
        if self.rooted { format!("/{joined}") } else { joined }
    }
}

fuzz_target!(|data: PathInput| {
    let path = data.build();
    let platform = Platform::ALL[usize::from(data.platform) % Platform::ALL.len()];
    let config = ValidationConfig::for_platform(platform);
    let options = SanitizeOptions::new().with_normalize(data.normalize);

    match pathvet::sanitize_filepath(path.as_str(), &config, &options) {
        Ok(sanitized) => {
            let (_, rest) = split_drive(&sanitized, platform);
            let separator = if platform == Platform::Windows { '\\' } else { '/' };
            for segment in rest.split(separator).filter(|s| !s.is_empty()) {
                if matches!(segment, "." | "..") {
                    continue;
                }
                assert!(
                    pathvet::is_valid_filename(segment, &config),
                    "segment {segment:?} of {sanitized:?} from {path:?} is invalid on {platform}"
                );
            }
        },
        Err(err) => {
            if matches!(
                err.reason(),
                ErrorReason::FoundAbsolutePath | ErrorReason::MalformedAbsolutePath
            ) {
                assert!(
                    pathvet::validate_filepath(path.as_str(), &config)
                        .is_err_and(|e| e.reason() == err.reason()),
                    "validator disagrees on {path:?}"
                );
            }
        },
    }
});
