//! `sanitize-name` and `sanitize-path`.

use anyhow::{Context, Result};
use pathvet::{SanitizeOptions, ValidationConfig, ValidationError};
use serde::Serialize;

use super::{SanitizeArgs, Target};
use crate::ui;

/// Outcome for one sanitized value.
#[derive(Debug, Serialize)]
pub struct SanitizeReport<'a> {
    pub value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized: Option<String>,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

/// Sanitize every value, printing one result per line.
pub fn execute(args: &SanitizeArgs, target: Target) -> Result<()> {
    let profile = args.rules.profile()?;
    let config = args.rules.validation_config(&profile)?;
    let options = args.sanitize_options(&profile);

    let reports = sanitize_all(&args.values, &config, &options, target);
    let failures = reports.iter().filter(|r| r.error.is_some()).count();

    if args.rules.json {
        let json = serde_json::to_string_pretty(&reports).context("Failed to encode report")?;
        println!("{json}");
    } else {
        for report in &reports {
            match (&report.sanitized, &report.error) {
                (Some(sanitized), _) => println!("{sanitized}"),
                (None, Some(err)) => ui::print_validation_failure(report.value, err),
                (None, None) => {},
            }
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} values could not be sanitized as a {}",
            reports.len(),
            target.label()
        );
    }
    Ok(())
}

/// Sanitize `values` with `config` and `options`.
pub fn sanitize_all<'a>(
    values: &'a [String],
    config: &ValidationConfig,
    options: &SanitizeOptions,
    target: Target,
) -> Vec<SanitizeReport<'a>> {
    values
        .iter()
        .map(|value| {
            let result = match target {
                Target::Name => pathvet::sanitize_filename(value, config, options),
                Target::Path => pathvet::sanitize_filepath(value, config, options),
            };
            match result {
                Ok(sanitized) => SanitizeReport {
                    value,
                    changed: sanitized != *value,
                    sanitized: Some(sanitized),
                    error: None,
                },
                Err(err) => SanitizeReport {
                    value,
                    sanitized: None,
                    changed: false,
                    error: Some(err),
                },
            }
        })
        .collect()
}
