use tracing::trace;

use super::{check_boundaries, check_reserved, find_invalid_chars, has_rooted_drive, is_null_value};
use crate::config::ValidationConfig;
use crate::error::ValidationError;
use crate::rules::PlatformRules;

/// Validates a single path component.
///
/// Checks run in order and stop at the first failure:
///
/// 1. empty or whitespace-only value
/// 2. the value is itself an absolute path
/// 3. byte length within `[min_len, max_name_len]`
/// 4. reserved names, including the name with its extension stripped
/// 5. forbidden characters (all distinct offenders are reported)
/// 6. Windows-like platforms: trailing space or period, leading space
///
/// # Examples
///
/// ```
/// use pathvet::{ErrorReason, FilenameValidator, Platform, ValidationConfig};
///
/// let config = ValidationConfig::for_platform(Platform::Windows);
/// let validator = FilenameValidator::new(&config);
///
/// assert!(validator.is_valid("report.txt"));
/// let err = validator.validate("CON").unwrap_err();
/// assert_eq!(err.reason(), ErrorReason::ReservedName);
/// assert_eq!(err.reusable_name(), Some(false));
/// ```
#[derive(Clone, Copy)]
pub struct FilenameValidator<'a> {
    config: &'a ValidationConfig,
    rules: &'static dyn PlatformRules,
}

impl<'a> FilenameValidator<'a> {
    #[must_use]
    pub fn new(config: &'a ValidationConfig) -> Self {
        Self {
            config,
            rules: config.rules(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &'a ValidationConfig {
        self.config
    }

    /// Validate `value` as a filename.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`ValidationError`].
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        self.check(value).inspect_err(|err| {
            trace!(
                platform = %self.config.platform(),
                reason = err.reason().name(),
                value = value,
                "Filename rejected"
            );
        })
    }

    /// True if `value` passes [`FilenameValidator::validate`].
    #[must_use]
    pub fn is_valid(&self, value: &str) -> bool {
        self.validate(value).is_ok()
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        let platform = self.config.platform();

        if is_null_value(value, self.config) {
            return Err(ValidationError::null_name(platform));
        }

        self.check_not_absolute(value)?;

        let encoding = self.config.fs_encoding();
        let byte_count = encoding.byte_len(value);
        if byte_count < self.config.min_len() || byte_count > self.config.max_name_len() {
            return Err(ValidationError::invalid_length(
                platform,
                "file name",
                byte_count,
                self.config.min_len(),
                self.config.max_name_len(),
                encoding,
            ));
        }

        check_reserved(value, self.config)?;

        let invalid = find_invalid_chars(value, |c| self.rules.is_forbidden_in_name(c));
        if !invalid.is_empty() {
            return Err(ValidationError::invalid_characters(platform, value, invalid));
        }

        check_boundaries(value, self.config)
    }

    fn check_not_absolute(&self, value: &str) -> Result<(), ValidationError> {
        let platform = self.config.platform();

        let absolute = if platform.is_windows_like() {
            value.starts_with(['/', '\\']) || has_rooted_drive(value)
        } else {
            value.starts_with('/')
        };

        if absolute {
            return Err(ValidationError::found_abs_path(platform, value, "a file name"));
        }
        Ok(())
    }
}
