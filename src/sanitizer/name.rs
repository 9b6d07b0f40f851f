use tracing::debug;

use super::MAX_RECOVERY_ROUNDS;
use crate::config::{SanitizeOptions, ValidationConfig};
use crate::error::{ErrorReason, ValidationError};
use crate::validator::{FilenameValidator, is_null_value};

/// Repairs a single path component.
///
/// 1. An empty value goes straight to the null value handler.
/// 2. Every forbidden character is replaced, then the result is truncated
///    to `max_name_len` encoded bytes.
/// 3. The candidate is re-validated. Reserved names are rewritten by the
///    reserved name handler, Windows boundary spaces and periods are
///    trimmed, and an empty candidate goes to the null value handler.
///    Any other failure is returned.
/// 4. With `validate_after_sanitize`, a residual failure, including one the
///    recovery step gave up on, is reported as
///    [`ErrorReason::InvalidAfterSanitize`]. Handler escalations are not
///    wrapped.
///
/// # Examples
///
/// ```
/// use pathvet::{FilenameSanitizer, Platform, SanitizeOptions, ValidationConfig};
///
/// let config = ValidationConfig::for_platform(Platform::Windows);
/// let options = SanitizeOptions::default();
/// let sanitizer = FilenameSanitizer::new(&config, &options);
///
/// assert_eq!(sanitizer.sanitize("CON").unwrap(), "CON_");
/// assert_eq!(sanitizer.sanitize("a?b*c.txt").unwrap(), "abc.txt");
/// assert_eq!(sanitizer.sanitize("name. ").unwrap(), "name");
/// ```
#[derive(Clone, Copy)]
pub struct FilenameSanitizer<'a> {
    config: &'a ValidationConfig,
    options: &'a SanitizeOptions,
    validator: FilenameValidator<'a>,
}

impl<'a> FilenameSanitizer<'a> {
    #[must_use]
    pub fn new(config: &'a ValidationConfig, options: &'a SanitizeOptions) -> Self {
        Self {
            config,
            options,
            validator: FilenameValidator::new(config),
        }
    }

    /// Sanitize `value` into a valid filename.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a handler escalates, when a defect
    /// cannot be repaired, or when the post-sanitize check fails.
    pub fn sanitize(&self, value: &str) -> Result<String, ValidationError> {
        let sanitized = self.sanitize_unchecked(value)?;

        if self.options.validate_after_sanitize() {
            self.validator
                .validate(&sanitized)
                .map_err(|err| ValidationError::invalid_after_sanitize(self.config.platform(), err))?;
        }

        Ok(sanitized)
    }

    /// Sanitize without the post-sanitize check.
    pub(crate) fn sanitize_unchecked(&self, value: &str) -> Result<String, ValidationError> {
        match self.repair(value)? {
            Some(sanitized) => Ok(sanitized),
            None => self.handle_null(),
        }
    }

    /// Substitute, truncate and recover. `None` means nothing usable is left.
    pub(crate) fn repair(&self, value: &str) -> Result<Option<String>, ValidationError> {
        let platform = self.config.platform();

        if is_null_value(value, self.config) {
            return Ok(None);
        }

        let mut candidate = self.truncate(&self.substitute(value));

        for _ in 0..MAX_RECOVERY_ROUNDS {
            let err = match self.validator.validate(&candidate) {
                Ok(()) => break,
                Err(err) => err,
            };

            match err.reason() {
                ErrorReason::NullName => return Ok(None),
                ErrorReason::ReservedName => match self.rewrite_reserved(&candidate, &err)? {
                    Recovery::Rewritten(next) => candidate = next,
                    Recovery::Keep => break,
                    Recovery::Stuck => return Err(self.unrecoverable(err)),
                },
                ErrorReason::InvalidCharacter if err.is_boundary_violation() => {
                    let trimmed = trim_boundaries(&candidate);
                    if trimmed == candidate {
                        return Err(self.unrecoverable(err));
                    }
                    debug!(
                        platform = %platform,
                        before = %candidate,
                        after = %trimmed,
                        "Trimmed name boundaries"
                    );
                    candidate = trimmed.to_string();
                },
                _ => return Err(self.unrecoverable(err)),
            }
        }

        Ok(Some(candidate))
    }

    /// A failure left over after recovery, wrapped when the post-sanitize check is on.
    fn unrecoverable(&self, err: ValidationError) -> ValidationError {
        if self.options.validate_after_sanitize() {
            ValidationError::invalid_after_sanitize(self.config.platform(), err)
        } else {
            err
        }
    }

    fn substitute(&self, value: &str) -> String {
        let rules = self.config.rules();
        let replacement = self.options.replacement_text();

        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            if rules.is_forbidden_in_name(c) {
                out.push_str(replacement);
            } else {
                out.push(c);
            }
        }
        out
    }

    fn truncate(&self, value: &str) -> String {
        self.config
            .fs_encoding()
            .truncate(value, self.config.max_name_len())
            .to_string()
    }

    fn handle_null(&self) -> Result<String, ValidationError> {
        let platform = self.config.platform();
        debug!(platform = %platform, "Null name, invoking null value handler");
        self.options
            .null_value_handler()
            .handle(&ValidationError::null_name(platform))
    }

    fn rewrite_reserved(
        &self,
        candidate: &str,
        err: &ValidationError,
    ) -> Result<Recovery, ValidationError> {
        let token = err.reserved_name().unwrap_or(candidate);

        if err.reusable_name() == Some(true) || matches!(token, "." | "..") {
            return Ok(Recovery::Keep);
        }

        let replacement = self.options.reserved_name_handler().handle(err)?;
        if replacement == token {
            return Ok(Recovery::Keep);
        }

        let rest = candidate.strip_prefix(token).unwrap_or_default();
        let next = self.truncate(&format!("{replacement}{rest}"));
        if next == candidate {
            return Ok(Recovery::Stuck);
        }

        debug!(
            platform = %self.config.platform(),
            reserved = %token,
            replacement = %replacement,
            "Rewrote reserved name"
        );
        Ok(Recovery::Rewritten(next))
    }
}

/// Outcome of one reserved-name rewrite.
enum Recovery {
    Rewritten(String),
    /// The handler leaves the name as it is.
    Keep,
    /// Truncation undid the rewrite.
    Stuck,
}

/// Strip a leading space run, then a trailing space/period run unless only `.` or `..` is left.
fn trim_boundaries(value: &str) -> &str {
    let value = value.trim_start_matches(' ');
    if matches!(value, "." | "..") {
        return value;
    }
    value.trim_end_matches([' ', '.'])
}
