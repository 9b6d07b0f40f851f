//! Filename validation and sanitization through the public API.
//!
//! Run with:
//! ```bash
//! cargo test --test filename_tests
//! ```

use std::path::{Path, PathBuf};

use pathvet::{
    ErrorReason, FsEncoding, NullValuePolicy, Platform, ReservedNamePolicy, SanitizeOptions,
    ValidationConfig, ValidationError, is_valid_filename, sanitize_filename, validate_filename,
};

fn config(platform: Platform) -> ValidationConfig {
    ValidationConfig::for_platform(platform)
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn test_con_on_windows() {
    let windows = config(Platform::Windows);

    let err = validate_filename("CON", &windows).unwrap_err();
    assert_eq!(err.reason(), ErrorReason::ReservedName);
    assert_eq!(err.reusable_name(), Some(false));
    assert_eq!(err.reserved_name(), Some("CON"));

    let sanitized = sanitize_filename("CON", &windows, &SanitizeOptions::default()).unwrap();
    assert_eq!(sanitized, "CON_");
}

#[test]
fn test_slash_in_universal_name() {
    let err = validate_filename("a/b", &config(Platform::Universal)).unwrap_err();
    assert_eq!(err.reason(), ErrorReason::InvalidCharacter);
    assert_eq!(err.invalid_chars(), &['/']);
    assert_eq!(
        err.to_string(),
        "[PV1100] invalid characters found: invalids=('/'), value='a/b', target-platform=universal"
    );
}

#[test]
fn test_empty_name_on_linux() {
    let linux = config(Platform::Linux);

    let err = validate_filename("", &linux).unwrap_err();
    assert_eq!(err.reason(), ErrorReason::NullName);

    let sanitized = sanitize_filename(None::<&str>, &linux, &SanitizeOptions::default()).unwrap();
    assert_eq!(sanitized, "");
}

#[test]
fn test_long_name_truncated_to_max() {
    let name = "a".repeat(300);
    let config = ValidationConfig::builder().max_name_len(255).build().unwrap();

    let sanitized = sanitize_filename(name.as_str(), &config, &SanitizeOptions::default()).unwrap();
    assert_eq!(sanitized.len(), 255);
    assert!(is_valid_filename(sanitized.as_str(), &config));
}

// =============================================================================
// Platform Differences
// =============================================================================

#[test]
fn test_same_name_across_platforms() {
    let cases: &[(&str, &[Platform])] = &[
        ("a:b", &[Platform::Linux, Platform::Posix, Platform::MacOS]),
        ("aux.txt", &[Platform::Linux, Platform::Posix, Platform::MacOS]),
        ("name.", &[Platform::Linux, Platform::Posix, Platform::MacOS]),
        ("plain.txt", &Platform::ALL),
    ];

    for (name, valid_on) in cases {
        for platform in Platform::ALL {
            assert_eq!(
                is_valid_filename(*name, &config(platform)),
                valid_on.contains(&platform),
                "{name:?} on {platform}"
            );
        }
    }
}

#[test]
fn test_platform_aliases() {
    let config = ValidationConfig::builder().platform("WIN32").build().unwrap();
    assert_eq!(config.platform(), Platform::Windows);
    assert!(!is_valid_filename("nul", &config));

    let config = ValidationConfig::builder().platform("unknown-os").build().unwrap();
    assert_eq!(config.platform(), Platform::Universal);
}

#[test]
fn test_fs_encoding_changes_limit() {
    let name = "あ".repeat(100);

    let utf8 = ValidationConfig::builder()
        .platform(Platform::Linux)
        .build()
        .unwrap();
    let err = validate_filename(name.as_str(), &utf8).unwrap_err();
    assert_eq!(err.reason(), ErrorReason::InvalidLength);
    assert_eq!(err.byte_count(), Some(300));

    let utf16 = ValidationConfig::builder()
        .platform(Platform::Linux)
        .fs_encoding(FsEncoding::Utf16)
        .build()
        .unwrap();
    assert!(is_valid_filename(name.as_str(), &utf16));
}

// =============================================================================
// Recovery Policies
// =============================================================================

#[test]
fn test_custom_reserved_handler() {
    let windows = config(Platform::Windows);
    let options = SanitizeOptions::new().with_reserved_name_handler(
        |err: &ValidationError| -> Result<String, ValidationError> {
            Ok(format!("{}-file", err.reserved_name().unwrap_or_default()))
        },
    );
    assert_eq!(sanitize_filename("prn.log", &windows, &options).unwrap(), "prn-file.log");
}

#[test]
fn test_builtin_policies() {
    let windows = config(Platform::Windows);

    let prepend = SanitizeOptions::new().with_reserved_name_handler(ReservedNamePolicy::PrependUnderscore);
    assert_eq!(sanitize_filename("COM1", &windows, &prepend).unwrap(), "_COM1");

    let timestamp = SanitizeOptions::new().with_null_value_handler(NullValuePolicy::ReturnTimestamp);
    let value = sanitize_filename("???", &windows, &timestamp).unwrap();
    assert!(is_valid_filename(value.as_str(), &windows), "{value}");

    let raise = SanitizeOptions::new().with_null_value_handler(NullValuePolicy::RaiseError);
    let err = sanitize_filename("", &windows, &raise).unwrap_err();
    assert_eq!(err.reason(), ErrorReason::NullName);
}

#[test]
fn test_post_sanitize_check() {
    let windows = config(Platform::Windows);
    let options = SanitizeOptions::new()
        .with_reserved_name_handler(ReservedNamePolicy::AsIs)
        .with_validate_after_sanitize(true);

    let err = sanitize_filename("LPT1", &windows, &options).unwrap_err();
    assert_eq!(err.reason(), ErrorReason::InvalidAfterSanitize);
    assert!(err.to_string().starts_with("[PV2000]"));
}

// =============================================================================
// Path-like Inputs
// =============================================================================

#[test]
fn test_path_inputs() {
    let windows = config(Platform::Windows);
    let options = SanitizeOptions::default();

    assert!(is_valid_filename(Path::new("report.pdf"), &windows));
    let sanitized: PathBuf = sanitize_filename(PathBuf::from("re|port.pdf"), &windows, &options).unwrap();
    assert_eq!(sanitized, PathBuf::from("report.pdf"));

    let owned = String::from("a*b");
    let sanitized: String = sanitize_filename(&owned, &windows, &options).unwrap();
    assert_eq!(sanitized, "ab");
}
