use std::borrow::Cow;

use tracing::trace;

use super::{
    check_absolute_path, check_boundaries, check_reserved, find_invalid_chars, is_null_value,
    split_drive,
};
use crate::config::ValidationConfig;
use crate::error::ValidationError;
use crate::platform::Platform;
use crate::rules::PlatformRules;

/// Validates a full file path.
///
/// The drive or UNC prefix is split off first and never inspected segment
/// by segment. The remainder is scanned for forbidden path characters,
/// then every segment other than `.` and `..` gets the component checks of
/// [`crate::FilenameValidator`] except the minimum length. Finally the
/// whole path length is checked against `[min_len, max_path_len]`.
///
/// # Examples
///
/// ```
/// use pathvet::{ErrorReason, FilepathValidator, Platform, ValidationConfig};
///
/// let linux = ValidationConfig::for_platform(Platform::Linux);
/// let err = FilepathValidator::new(&linux).validate(r"C:\Users").unwrap_err();
/// assert_eq!(err.reason(), ErrorReason::MalformedAbsolutePath);
///
/// let windows = ValidationConfig::for_platform(Platform::Windows);
/// assert!(FilepathValidator::new(&windows).is_valid(r"C:\Users"));
/// ```
#[derive(Clone, Copy)]
pub struct FilepathValidator<'a> {
    config: &'a ValidationConfig,
    rules: &'static dyn PlatformRules,
}

impl<'a> FilepathValidator<'a> {
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

    /// Validate `value` as a file path.
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
                "File path rejected"
            );
        })
    }

    /// True if `value` passes [`FilepathValidator::validate`].
    #[must_use]
    pub fn is_valid(&self, value: &str) -> bool {
        self.validate(value).is_ok()
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        let platform = self.config.platform();

        if is_null_value(value, self.config) {
            return Err(ValidationError::null_name(platform));
        }

        check_absolute_path(value, platform)?;

        let (drive, raw) = split_drive(value, platform);
        if raw.is_empty() {
            return Ok(());
        }

        let rest = self.unify_separators(raw);

        let invalid = find_invalid_chars(&rest, |c| self.rules.is_forbidden_in_path(c));
        if !invalid.is_empty() {
            return Err(ValidationError::invalid_characters(platform, value, invalid));
        }

        let encoding = self.config.fs_encoding();
        let mut segments = rest.split('/').filter(|s| !s.is_empty()).peekable();

        if self.config.check_reserved()
            && let Some(first) = segments.peek()
            && self.rules.is_root_reserved_name(first)
        {
            return Err(ValidationError::reserved(platform, *first, false));
        }

        for segment in segments.filter(|s| !matches!(*s, "." | "..")) {
            let byte_count = encoding.byte_len(segment);
            if byte_count > self.config.max_name_len() {
                return Err(ValidationError::invalid_length(
                    platform,
                    "file name",
                    byte_count,
                    self.config.min_len(),
                    self.config.max_name_len(),
                    encoding,
                ));
            }

            check_reserved(segment, self.config)?;
            check_boundaries(segment, self.config)?;
        }

        // POSIX platforms read `\` as part of a name.
        if platform == Platform::Universal {
            self.check_segment_lengths(raw.split('/'))?;
        }

        let byte_count = encoding.byte_len(drive) + encoding.byte_len(&rest);
        if byte_count < self.config.min_len() || byte_count > self.config.max_path_len() {
            return Err(ValidationError::invalid_length(
                platform,
                "file path",
                byte_count,
                self.config.min_len(),
                self.config.max_path_len(),
                encoding,
            ));
        }

        Ok(())
    }

    fn check_segment_lengths<'v>(
        &self,
        segments: impl Iterator<Item = &'v str>,
    ) -> Result<(), ValidationError> {
        let encoding = self.config.fs_encoding();
        for segment in segments {
            let byte_count = encoding.byte_len(segment);
            if byte_count > self.config.max_name_len() {
                return Err(ValidationError::invalid_length(
                    self.config.platform(),
                    "file name",
                    byte_count,
                    self.config.min_len(),
                    self.config.max_name_len(),
                    encoding,
                ));
            }
        }
        Ok(())
    }

    fn unify_separators<'v>(&self, value: &'v str) -> Cow<'v, str> {
        if self.config.platform().is_windows_like() && value.contains('\\') {
            Cow::Owned(value.replace('\\', "/"))
        } else {
            Cow::Borrowed(value)
        }
    }
}
