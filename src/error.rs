//! Error types for validation and sanitization.
//!
//! Validators report the first violated rule as a [`ValidationError`]. The
//! [`ErrorReason`] is the stable, closed part of the contract: argument
//! parser integrations and callers that want to recover match on it, never
//! on the message text.

use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::encoding::FsEncoding;
use crate::platform::Platform;

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    /// The value is empty or whitespace only.
    NullName,
    /// The value is a name the platform reserves.
    ReservedName,
    /// The value contains characters the platform forbids.
    InvalidCharacter,
    /// The value is too short or too long in bytes.
    InvalidLength,
    /// An absolute path was found where a relative one is required.
    FoundAbsolutePath,
    /// An absolute path has a form the platform does not understand.
    MalformedAbsolutePath,
    /// Sanitizing did not produce a valid value.
    InvalidAfterSanitize,
}

impl ErrorReason {
    /// Stable error code, e.g. `PV1100`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::NullName => "PV1001",
            Self::ReservedName => "PV1002",
            Self::InvalidCharacter => "PV1100",
            Self::InvalidLength => "PV1101",
            Self::FoundAbsolutePath => "PV1200",
            Self::MalformedAbsolutePath => "PV1201",
            Self::InvalidAfterSanitize => "PV2000",
        }
    }

    /// Upper snake case name, e.g. `INVALID_CHARACTER`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NullName => "NULL_NAME",
            Self::ReservedName => "RESERVED_NAME",
            Self::InvalidCharacter => "INVALID_CHARACTER",
            Self::InvalidLength => "INVALID_LENGTH",
            Self::FoundAbsolutePath => "FOUND_ABSOLUTE_PATH",
            Self::MalformedAbsolutePath => "MALFORMED_ABSOLUTE_PATH",
            Self::InvalidAfterSanitize => "INVALID_AFTER_SANITIZE",
        }
    }

    /// One-line human description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::NullName => "the value must not be empty",
            Self::ReservedName => "found a reserved name by a platform",
            Self::InvalidCharacter => "invalid characters found",
            Self::InvalidLength => "found an invalid string length",
            Self::FoundAbsolutePath => "found an absolute path where must be a relative path",
            Self::MalformedAbsolutePath => "found a malformed absolute path",
            Self::InvalidAfterSanitize => "found invalid value after sanitizing",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.description())
    }
}

/// A rejected filename or file path.
///
/// Beyond the [`reason`](Self::reason), each error carries the context a
/// caller needs to act on it: the offending characters for
/// [`ErrorReason::InvalidCharacter`], the byte count and encoding for
/// [`ErrorReason::InvalidLength`], and the reserved token for
/// [`ErrorReason::ReservedName`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    reason: ErrorReason,
    message: String,
    platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    byte_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fs_encoding: Option<FsEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reserved_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reusable_name: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    invalid_chars: Vec<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Box<ValidationError>>,
    #[serde(skip)]
    boundary: bool,
}

impl ValidationError {
    fn new(reason: ErrorReason, platform: Platform, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            platform,
            description: None,
            byte_count: None,
            fs_encoding: None,
            reserved_name: None,
            reusable_name: None,
            invalid_chars: Vec::new(),
            source: None,
            boundary: false,
        }
    }

    /// Create a null name error.
    pub fn null_name(platform: Platform) -> Self {
        Self::new(ErrorReason::NullName, platform, "null name")
    }

    /// Create a reserved name error.
    pub fn reserved(platform: Platform, reserved: impl Into<String>, reusable: bool) -> Self {
        let reserved = reserved.into();
        let mut err = Self::new(
            ErrorReason::ReservedName,
            platform,
            format!("'{}' is a reserved name", reserved.escape_debug()),
        );
        err.reserved_name = Some(reserved);
        err.reusable_name = Some(reusable);
        err
    }

    /// Create an invalid character error listing every distinct offending character.
    pub fn invalid_characters(platform: Platform, value: &str, invalid: Vec<char>) -> Self {
        let listed = invalid
            .iter()
            .map(|c| format!("'{}'", c.escape_debug()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut err = Self::new(
            ErrorReason::InvalidCharacter,
            platform,
            format!("invalids=({listed}), value='{}'", value.escape_debug()),
        );
        err.invalid_chars = invalid;
        err
    }

    /// Create an invalid character error for a leading space or trailing space/period.
    pub(crate) fn invalid_boundary(platform: Platform, value: &str, offending: char, what: &str) -> Self {
        let mut err = Self::invalid_characters(platform, value, vec![offending]);
        err.description = Some(format!(
            "{what}. Refer: https://learn.microsoft.com/en-us/troubleshoot/windows-client/shell-experience/file-folder-name-whitespace-characters"
        ));
        err.boundary = true;
        err
    }

    /// Create an invalid length error.
    pub fn invalid_length(
        platform: Platform,
        subject: &str,
        byte_count: usize,
        min_len: usize,
        max_len: usize,
        encoding: FsEncoding,
    ) -> Self {
        let message = if byte_count > max_len {
            format!("{subject} is too long: expected<={max_len} bytes, actual={byte_count} bytes")
        } else {
            format!("{subject} is too short: expected>={min_len} bytes, actual={byte_count} bytes")
        };
        let mut err = Self::new(ErrorReason::InvalidLength, platform, message);
        err.byte_count = Some(byte_count);
        err.fs_encoding = Some(encoding);
        err
    }

    /// Create a found absolute path error.
    pub fn found_abs_path(platform: Platform, value: &str, expected: &str) -> Self {
        let mut err = Self::new(
            ErrorReason::FoundAbsolutePath,
            platform,
            format!("found an absolute path ('{}'), expected {expected}", value.escape_debug()),
        );
        err.description = Some(format!(
            "an absolute path is not allowed for the platform ({platform}). specify an appropriate platform or 'auto'."
        ));
        err
    }

    /// Create a malformed absolute path error.
    pub fn malformed_abs_path(platform: Platform, value: &str) -> Self {
        let mut err = Self::new(
            ErrorReason::MalformedAbsolutePath,
            platform,
            format!("an invalid absolute file path ('{}')", value.escape_debug()),
        );
        err.description = Some(format!(
            "the absolute path form is not valid for the platform ({platform}). specify an appropriate platform or 'auto'."
        ));
        err
    }

    /// Wrap a residual failure found by the post-sanitize check.
    pub fn invalid_after_sanitize(platform: Platform, source: ValidationError) -> Self {
        let mut err = Self::new(ErrorReason::InvalidAfterSanitize, platform, "");
        err.description = Some(source.to_string());
        err.source = Some(Box::new(source));
        err
    }

    /// Why the value was rejected.
    #[must_use]
    pub fn reason(&self) -> ErrorReason {
        self.reason
    }

    /// Human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Platform the value was checked against.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Extra explanation, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Computed byte length, for [`ErrorReason::InvalidLength`].
    #[must_use]
    pub fn byte_count(&self) -> Option<usize> {
        self.byte_count
    }

    /// Encoding used to count bytes, for [`ErrorReason::InvalidLength`].
    #[must_use]
    pub fn fs_encoding(&self) -> Option<FsEncoding> {
        self.fs_encoding
    }

    /// The reserved token that matched, for [`ErrorReason::ReservedName`].
    #[must_use]
    pub fn reserved_name(&self) -> Option<&str> {
        self.reserved_name.as_deref()
    }

    /// Whether the reserved token is still usable in some contexts.
    #[must_use]
    pub fn reusable_name(&self) -> Option<bool> {
        self.reusable_name
    }

    /// Distinct offending characters, in order of first appearance.
    #[must_use]
    pub fn invalid_chars(&self) -> &[char] {
        &self.invalid_chars
    }

    /// True for the Windows leading-space / trailing-space-or-period rule.
    #[must_use]
    pub fn is_boundary_violation(&self) -> bool {
        self.boundary
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items = Vec::new();

        if !self.message.is_empty() {
            items.push(self.message.clone());
        }
        items.push(format!("target-platform={}", self.platform));
        if let Some(description) = &self.description {
            items.push(format!("description={description}"));
        }
        if let Some(reusable) = self.reusable_name {
            items.push(format!("reusable_name={reusable}"));
        }
        if let Some(encoding) = self.fs_encoding {
            items.push(format!("fs-encoding={encoding}"));
        }

        write!(f, "{}: {}", self.reason, items.join(", "))
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}
