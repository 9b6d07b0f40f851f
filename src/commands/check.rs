//! `check-name` and `check-path`.

use anyhow::{Context, Result};
use pathvet::{Platform, ValidationConfig, ValidationError};
use serde::Serialize;

use super::{CheckArgs, Target};
use crate::ui;

/// Outcome for one checked value.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub value: &'a str,
    pub platform: Platform,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

/// Validate every value and fail if any of them is invalid.
pub fn execute(args: &CheckArgs, target: Target) -> Result<()> {
    let profile = args.rules.profile()?;
    let config = args.rules.validation_config(&profile)?;

    let reports = check_all(&args.values, &config, target);
    let failures = reports.iter().filter(|r| !r.valid).count();

    if args.rules.json {
        let json = serde_json::to_string_pretty(&reports).context("Failed to encode report")?;
        println!("{json}");
    } else {
        for report in &reports {
            match &report.error {
                None => println!("ok: {}", report.value),
                Some(err) => ui::print_validation_failure(report.value, err),
            }
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} values failed {} validation for {}",
            reports.len(),
            target.label(),
            config.platform()
        );
    }
    Ok(())
}

/// Validate `values` against `config`.
pub fn check_all<'a>(values: &'a [String], config: &ValidationConfig, target: Target) -> Vec<CheckReport<'a>> {
    values
        .iter()
        .map(|value| {
            let result = match target {
                Target::Name => pathvet::validate_filename(value, config),
                Target::Path => pathvet::validate_filepath(value, config),
            };
            CheckReport {
                value,
                platform: config.platform(),
                valid: result.is_ok(),
                error: result.err(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathvet::ErrorReason;

    #[test]
    fn test_check_all_names() {
        let config = ValidationConfig::for_platform(Platform::Windows);
        let values = vec!["ok.txt".to_string(), "CON".to_string(), "a?b".to_string()];
        let reports = check_all(&values, &config, Target::Name);

        assert!(reports[0].valid);
        assert_eq!(reports[1].error.as_ref().map(|e| e.reason()), Some(ErrorReason::ReservedName));
        assert_eq!(
            reports[2].error.as_ref().map(|e| e.reason()),
            Some(ErrorReason::InvalidCharacter)
        );
    }

    #[test]
    fn test_check_all_paths() {
        let config = ValidationConfig::for_platform(Platform::Linux);
        let values = vec!["/usr/bin".to_string(), r"C:\Users".to_string()];
        let reports = check_all(&values, &config, Target::Path);
        assert!(reports[0].valid);
        assert_eq!(
            reports[1].error.as_ref().map(|e| e.reason()),
            Some(ErrorReason::MalformedAbsolutePath)
        );
    }

    #[test]
    fn test_report_json_shape() {
        let config = ValidationConfig::for_platform(Platform::Universal);
        let values = vec!["a/b".to_string()];
        let reports = check_all(&values, &config, Target::Name);
        let json: serde_json::Value = serde_json::to_value(&reports).unwrap();

        assert_eq!(json[0]["value"], "a/b");
        assert_eq!(json[0]["platform"], "universal");
        assert_eq!(json[0]["valid"], false);
        assert_eq!(json[0]["error"]["reason"], "INVALID_CHARACTER");
        assert_eq!(json[0]["error"]["invalid_chars"][0], "/");
    }
}
