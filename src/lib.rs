//! Platform-aware validation and sanitization of filenames and file paths.
//!
//! `pathvet` decides whether a filename or file path is usable on a target
//! platform and, when it is not, repairs it into one that is. Nothing here
//! touches the filesystem: every check is a pure function of the input, a
//! [`ValidationConfig`], and a static per-platform rule table.
//!
//! - [`platform`] - target platform resolution (`"auto"`, aliases)
//! - [`rules`] - per-platform forbidden characters, reserved names, limits
//! - [`validator`] - [`FilenameValidator`] and [`FilepathValidator`]
//! - [`sanitizer`] - [`FilenameSanitizer`] and [`FilepathSanitizer`]
//! - [`handler`] - null value and reserved name recovery policies
//! - [`config`] - [`ValidationConfig`], [`SanitizeOptions`], TOML [`Profile`]
//! - [`error`] - [`ValidationError`] and its [`ErrorReason`] codes
//!
//! # Examples
//!
//! ```
//! use pathvet::{ErrorReason, Platform, SanitizeOptions, ValidationConfig};
//!
//! let windows = ValidationConfig::for_platform(Platform::Windows);
//! let options = SanitizeOptions::default();
//!
//! let err = pathvet::validate_filename("CON", &windows).unwrap_err();
//! assert_eq!(err.reason(), ErrorReason::ReservedName);
//! assert_eq!(pathvet::sanitize_filename("CON", &windows, &options).unwrap(), "CON_");
//!
//! let universal = ValidationConfig::default();
//! assert!(!pathvet::is_valid_filename("a/b", &universal));
//! assert_eq!(pathvet::sanitize_filepath("a/b", &universal, &options).unwrap(), "a/b");
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod handler;
pub mod input;
pub mod platform;
pub mod rules;
pub mod sanitizer;
pub mod validator;

use tracing::debug;

pub use config::{ConfigError, Profile, SanitizeOptions, ValidationConfig, ValidationConfigBuilder};
pub use encoding::FsEncoding;
pub use error::{ErrorReason, ValidationError};
pub use handler::{NullValueHandler, NullValuePolicy, ReservedNameHandler, ReservedNamePolicy};
pub use input::{InputText, PathLike};
pub use platform::{Platform, PlatformSelector};
pub use rules::{PlatformRules, RuleSet, rules_for};
pub use sanitizer::{FilenameSanitizer, FilepathSanitizer};
pub use validator::{FilenameValidator, FilepathValidator};

/// Run `check` on the text of `value`.
///
/// An absent value is a null name. Non-Unicode input fails with
/// [`ErrorReason::InvalidCharacter`] naming U+FFFD.
fn validate_input<P, F>(value: &P, config: &ValidationConfig, check: F) -> Result<(), ValidationError>
where
    P: PathLike + ?Sized,
    F: FnOnce(&str) -> Result<(), ValidationError>,
{
    let platform = config.platform();
    match value.as_input_text() {
        InputText::Absent => Err(ValidationError::null_name(platform)),
        InputText::Text(text) => check(&text),
        InputText::Lossy(text) => Err(ValidationError::invalid_characters(
            platform,
            &text,
            vec![char::REPLACEMENT_CHARACTER],
        )),
    }
}

/// Run `repair` on the text of `value`, wrapping the result in the input's output type.
///
/// An absent value is sanitized as an empty one. Non-Unicode input is
/// decoded lossily first.
fn sanitize_input<P, F>(value: &P, config: &ValidationConfig, repair: F) -> Result<P::Output, ValidationError>
where
    P: PathLike + ?Sized,
    F: FnOnce(&str) -> Result<String, ValidationError>,
{
    let sanitized = match value.as_input_text() {
        InputText::Absent => repair("")?,
        InputText::Text(text) => repair(&text)?,
        InputText::Lossy(text) => {
            debug!(platform = %config.platform(), "Decoded non-Unicode input lossily");
            repair(&text)?
        },
    };
    Ok(P::wrap_output(sanitized))
}

/// Validate a filename.
///
/// # Errors
///
/// Returns the first violated rule as a [`ValidationError`].
pub fn validate_filename<P: PathLike>(name: P, config: &ValidationConfig) -> Result<(), ValidationError> {
    let validator = FilenameValidator::new(config);
    validate_input(&name, config, |text| validator.validate(text))
}

/// Validate a file path.
///
/// # Errors
///
/// Returns the first violated rule as a [`ValidationError`].
pub fn validate_filepath<P: PathLike>(path: P, config: &ValidationConfig) -> Result<(), ValidationError> {
    let validator = FilepathValidator::new(config);
    validate_input(&path, config, |text| validator.validate(text))
}

/// True if `name` is a valid filename. Never fails.
#[must_use]
pub fn is_valid_filename<P: PathLike>(name: P, config: &ValidationConfig) -> bool {
    validate_filename(name, config).is_ok()
}

/// True if `path` is a valid file path. Never fails.
#[must_use]
pub fn is_valid_filepath<P: PathLike>(path: P, config: &ValidationConfig) -> bool {
    validate_filepath(path, config).is_ok()
}

/// Sanitize a filename.
///
/// The output type mirrors the input: `&str` and `String` give `String`,
/// `&Path` and `PathBuf` give `PathBuf`, `&OsStr` and `OsString` give `OsString`.
///
/// # Errors
///
/// Returns a [`ValidationError`] when a recovery handler escalates, a
/// defect cannot be repaired, or the post-sanitize check fails.
pub fn sanitize_filename<P: PathLike>(
    name: P,
    config: &ValidationConfig,
    options: &SanitizeOptions,
) -> Result<P::Output, ValidationError> {
    let sanitizer = FilenameSanitizer::new(config, options);
    sanitize_input(&name, config, |text| sanitizer.sanitize(text))
}

/// Sanitize a file path.
///
/// # Errors
///
/// Returns a [`ValidationError`] for an absolute path of the wrong shape,
/// when a recovery handler escalates, or when the post-sanitize check fails.
pub fn sanitize_filepath<P: PathLike>(
    path: P,
    config: &ValidationConfig,
    options: &SanitizeOptions,
) -> Result<P::Output, ValidationError> {
    let sanitizer = FilepathSanitizer::new(config, options);
    sanitize_input(&path, config, |text| sanitizer.sanitize(text))
}
