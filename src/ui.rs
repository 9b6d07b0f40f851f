//! UI utilities for consistent terminal output formatting.
//!
//! Provides shared formatting functions for validation failures.

use pathvet::{ErrorReason, ValidationError};

/// Width of error box separators.
const ERROR_BOX_WIDTH: usize = 60;

/// Print an error box with a title and optional body.
///
/// Outputs:
/// ```text
/// ============================================================
/// Invalid file name: CON
/// ============================================================
///
/// <body>
/// ```
pub fn print_error_box(title: &str, body: Option<&str>) {
    eprintln!("\n{}", "=".repeat(ERROR_BOX_WIDTH));
    eprintln!("{title}");
    eprintln!("{}", "=".repeat(ERROR_BOX_WIDTH));

    if let Some(body) = body
        && !body.is_empty()
    {
        eprintln!("\n{body}");
    }
}

/// Print an error box followed by numbered hints.
pub fn print_error_box_with_hints(title: &str, body: Option<&str>, hints: &[&str]) {
    print_error_box(title, body);

    if !hints.is_empty() {
        eprintln!("\n{}", "=".repeat(ERROR_BOX_WIDTH));
        eprintln!("Hints:");
        eprintln!("{}", "=".repeat(ERROR_BOX_WIDTH));

        for (i, hint) in hints.iter().enumerate() {
            eprintln!("\n{}. {hint}", i + 1);
        }
        eprintln!();
    }
}

/// Print a validation failure for `value`.
pub fn print_validation_failure(value: &str, err: &ValidationError) {
    let title = format!("{}: {}", err.reason().code(), value.escape_debug());
    print_error_box_with_hints(&title, Some(&err.to_string()), &hints_for(err.reason()));
}

/// Suggested fixes for a failure reason.
fn hints_for(reason: ErrorReason) -> Vec<&'static str> {
    match reason {
        ErrorReason::NullName => vec!["Provide a non-empty value."],
        ErrorReason::ReservedName => vec![
            "Rename it, or run sanitize-name to add a suffix.",
            "Pass --no-check-reserved if reserved names are acceptable.",
        ],
        ErrorReason::InvalidCharacter => {
            vec!["Run sanitize-name or sanitize-path to remove forbidden characters."]
        },
        ErrorReason::InvalidLength => vec!["Adjust --min-len, --max-len or --max-path-len."],
        ErrorReason::FoundAbsolutePath | ErrorReason::MalformedAbsolutePath => vec![
            "Use a relative path, or pick the platform the path was written for with --platform.",
        ],
        ErrorReason::InvalidAfterSanitize => {
            vec!["Choose a --replacement that contains no forbidden characters."]
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reason_has_a_hint() {
        for reason in [
            ErrorReason::NullName,
            ErrorReason::ReservedName,
            ErrorReason::InvalidCharacter,
            ErrorReason::InvalidLength,
            ErrorReason::FoundAbsolutePath,
            ErrorReason::MalformedAbsolutePath,
            ErrorReason::InvalidAfterSanitize,
        ] {
            assert!(!hints_for(reason).is_empty());
        }
    }
}
