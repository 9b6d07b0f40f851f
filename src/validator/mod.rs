//! Filename and file path validators.
//!
//! Both validators report the first violated rule. Character scans are the
//! exception: they collect every distinct offending character in one pass.
//!
//! The helpers here are shared with the sanitizers so that repairs and
//! checks agree on what a drive, an absolute path and a reserved name are.

mod name;
mod path;

pub use name::FilenameValidator;
pub use path::FilepathValidator;

use crate::config::ValidationConfig;
use crate::error::ValidationError;
use crate::platform::Platform;

/// True if `c` is `/` or `\`.
fn is_any_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// True if `value` starts with an ASCII drive letter and a colon.
fn has_drive_letter(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// True if `value` starts with a drive letter followed by a separator (`C:\`, `C:/`).
fn has_rooted_drive(value: &str) -> bool {
    has_drive_letter(value) && value[2..].starts_with(is_any_separator)
}

/// Byte offset where a `\\server\share` prefix ends, or `None` for an incomplete prefix.
fn unc_prefix_end(value: &str) -> Option<usize> {
    let rest = &value[2..];
    let server_len = rest.find(is_any_separator)?;
    if server_len == 0 {
        return None;
    }

    let share_start = 2 + server_len + 1;
    let share = &value[share_start..];
    let share_len = share.find(is_any_separator).unwrap_or(share.len());
    if share_len == 0 {
        return None;
    }

    Some(share_start + share_len)
}

/// True if `value` starts with two separators.
fn is_unc_like(value: &str) -> bool {
    let mut chars = value.chars();
    matches!((chars.next(), chars.next()), (Some(a), Some(b)) if is_any_separator(a) && is_any_separator(b))
}

/// Split a Windows drive or UNC prefix off `value`.
///
/// Returns `("", value)` on every platform except Windows, and for values
/// without a well-formed prefix.
///
/// # Examples
///
/// ```
/// use pathvet::Platform;
/// use pathvet::validator::split_drive;
///
/// assert_eq!(split_drive(r"C:\Users", Platform::Windows), ("C:", r"\Users"));
/// assert_eq!(split_drive(r"\\host\share\a", Platform::Windows), (r"\\host\share", r"\a"));
/// assert_eq!(split_drive(r"C:\Users", Platform::Linux), ("", r"C:\Users"));
/// ```
#[must_use]
pub fn split_drive(value: &str, platform: Platform) -> (&str, &str) {
    if platform != Platform::Windows {
        return ("", value);
    }

    if is_unc_like(value) {
        return match unc_prefix_end(value) {
            Some(end) => value.split_at(end),
            None => ("", value),
        };
    }

    if has_drive_letter(value) {
        return value.split_at(2);
    }

    ("", value)
}

/// Apply the absolute-path policy of `platform` to a full path.
///
/// - POSIX family: `/` roots are fine; drive and `\\server` roots are malformed.
/// - Windows: drive, UNC and `\` roots are fine; a `/` root without a drive
///   is a foreign absolute path, an incomplete UNC prefix is malformed.
/// - Universal: every root is rejected, so the path stays relocatable.
///
/// # Errors
///
/// Returns [`crate::ErrorReason::FoundAbsolutePath`] or
/// [`crate::ErrorReason::MalformedAbsolutePath`].
pub fn check_absolute_path(value: &str, platform: Platform) -> Result<(), ValidationError> {
    match platform {
        Platform::Posix | Platform::Linux | Platform::MacOS => {
            if has_rooted_drive(value) || value.starts_with("\\\\") {
                return Err(ValidationError::malformed_abs_path(platform, value));
            }
        },
        Platform::Windows => {
            if is_unc_like(value) {
                if unc_prefix_end(value).is_none() {
                    return Err(ValidationError::malformed_abs_path(platform, value));
                }
            } else if value.starts_with('/') {
                return Err(ValidationError::found_abs_path(
                    platform,
                    value,
                    "a Windows path with a drive",
                ));
            }
        },
        Platform::Universal => {
            if value.starts_with('/') {
                return Err(ValidationError::found_abs_path(platform, value, "a relative path"));
            }
            if value.starts_with('\\') || has_rooted_drive(value) {
                return Err(ValidationError::malformed_abs_path(platform, value));
            }
        },
    }

    Ok(())
}

/// True if `value` is empty, or whitespace-only where that is not allowed.
pub(crate) fn is_null_value(value: &str, config: &ValidationConfig) -> bool {
    if value.is_empty() {
        return true;
    }
    value.trim().is_empty()
        && !(config.allow_whitespace_name() && config.platform().is_posix_family())
}

/// `value` without its last extension; leading dots never start an extension.
pub(crate) fn name_root(value: &str) -> &str {
    let leading_dots = value.len() - value.trim_start_matches('.').len();
    match value.rfind('.') {
        Some(idx) if idx >= leading_dots => &value[..idx],
        _ => value,
    }
}

/// Reserved-name check for a single component.
///
/// `.` and `..` are accepted on POSIX-family platforms and reported as
/// reusable on Windows-like ones.
pub(crate) fn check_reserved(value: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    if !config.check_reserved() {
        return Ok(());
    }

    let platform = config.platform();

    if matches!(value, "." | "..") {
        if platform.is_windows_like() {
            return Err(ValidationError::reserved(platform, value, true));
        }
        return Ok(());
    }

    if config.is_reserved(&value.to_uppercase()) {
        return Err(ValidationError::reserved(platform, value, false));
    }

    let root = name_root(value);
    if root != value && config.is_reserved(&root.to_uppercase()) {
        return Err(ValidationError::reserved(platform, root, false));
    }

    Ok(())
}

/// Distinct characters of `value` matching `forbidden`, in order of first appearance.
pub(crate) fn find_invalid_chars(value: &str, forbidden: impl Fn(char) -> bool) -> Vec<char> {
    let mut found = Vec::new();
    for c in value.chars().filter(|c| forbidden(*c)) {
        if !found.contains(&c) {
            found.push(c);
        }
    }
    found
}

/// Windows shell rules: no trailing space or period, no leading space.
pub(crate) fn check_boundaries(value: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    if !config.rules().restricts_name_boundaries() || matches!(value, "." | "..") {
        return Ok(());
    }

    let platform = config.platform();

    if let Some(last) = value.chars().last().filter(|c| matches!(c, ' ' | '.')) {
        return Err(ValidationError::invalid_boundary(
            platform,
            value,
            last,
            "Do not end a file or directory name with a space or a period",
        ));
    }
    if value.starts_with(' ') {
        return Err(ValidationError::invalid_boundary(
            platform,
            value,
            ' ',
            "Do not start a file or directory name with a space",
        ));
    }

    Ok(())
}
