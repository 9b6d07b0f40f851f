//! CLI command implementations for pathvet.
//!
//! - [`check`] - validate names or paths and report every failure
//! - [`sanitize`] - print a repaired value for each input
//!
//! Both commands share [`RuleArgs`]: the rule flags layered on top of an
//! optional TOML profile.

pub mod check;
pub mod sanitize;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pathvet::{
    FsEncoding, NullValuePolicy, Profile, ReservedNamePolicy, SanitizeOptions, ValidationConfig,
};

/// What the values on the command line are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Name,
    Path,
}

impl Target {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "file name",
            Self::Path => "file path",
        }
    }
}

/// Flags shared by every subcommand.
#[derive(Debug, Args)]
pub struct RuleArgs {
    /// Target platform: posix, linux, windows, macos, universal or auto
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Minimum length in bytes
    #[arg(long)]
    pub min_len: Option<usize>,

    /// Maximum filename length in bytes (0 = platform default)
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Maximum path length in bytes (0 = platform default)
    #[arg(long)]
    pub max_path_len: Option<usize>,

    /// Filesystem encoding used to count bytes (utf-8, utf-16, utf-32)
    #[arg(long)]
    pub fs_encoding: Option<FsEncoding>,

    /// Skip reserved-name checks
    #[arg(long)]
    pub no_check_reserved: bool,

    /// Additional reserved name (repeatable)
    #[arg(long = "reserved", value_name = "NAME")]
    pub reserved: Vec<String>,

    /// Accept whitespace-only names on POSIX platforms
    #[arg(long)]
    pub allow_whitespace: bool,

    /// TOML profile with default settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl RuleArgs {
    /// Profile from `--config`, or the defaults.
    pub fn profile(&self) -> Result<Profile> {
        match &self.config {
            Some(path) => Profile::load_from(path),
            None => Ok(Profile::default()),
        }
    }

    /// Resolve the profile and the flags into a validation config.
    pub fn validation_config(&self, profile: &Profile) -> Result<ValidationConfig> {
        let mut builder = profile
            .builder()
            .additional_reserved_names(&self.reserved);

        if let Some(platform) = &self.platform {
            builder = builder.platform(platform);
        }
        if let Some(min_len) = self.min_len {
            builder = builder.min_len(min_len);
        }
        if let Some(max_len) = self.max_len {
            builder = builder.max_name_len(max_len);
        }
        if let Some(max_path_len) = self.max_path_len {
            builder = builder.max_path_len(max_path_len);
        }
        if let Some(encoding) = self.fs_encoding {
            builder = builder.fs_encoding(encoding);
        }
        if self.no_check_reserved {
            builder = builder.check_reserved(false);
        }
        if self.allow_whitespace {
            builder = builder.allow_whitespace_name(true);
        }

        builder.build().context("Invalid validation settings")
    }
}

/// Arguments for `check-name` and `check-path`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub rules: RuleArgs,

    /// Values to check
    #[arg(required = true)]
    pub values: Vec<String>,
}

/// Arguments for `sanitize-name` and `sanitize-path`.
#[derive(Debug, Args)]
pub struct SanitizeArgs {
    #[command(flatten)]
    pub rules: RuleArgs,

    /// Text substituted for each forbidden character
    #[arg(short, long)]
    pub replacement: Option<String>,

    /// What an empty result becomes
    #[arg(long, value_enum)]
    pub null_value: Option<NullValuePolicy>,

    /// How reserved names are rewritten
    #[arg(long, value_enum)]
    pub reserved_name: Option<ReservedNamePolicy>,

    /// Fail if the sanitized value is still invalid
    #[arg(long)]
    pub validate_after: bool,

    /// Keep `.`, `..` and repeated separators in paths as they are
    #[arg(long)]
    pub no_normalize: bool,

    /// Values to sanitize
    #[arg(required = true)]
    pub values: Vec<String>,
}

impl SanitizeArgs {
    /// Resolve the profile's `[sanitize]` table and the flags.
    pub fn sanitize_options(&self, profile: &Profile) -> SanitizeOptions {
        let mut options = profile.sanitize_options();

        if let Some(text) = &self.replacement {
            options = options.with_replacement_text(text.clone());
        }
        if let Some(policy) = self.null_value {
            options = options.with_null_value_handler(policy);
        }
        if let Some(policy) = self.reserved_name {
            options = options.with_reserved_name_handler(policy);
        }
        if self.validate_after {
            options = options.with_validate_after_sanitize(true);
        }
        if self.no_normalize {
            options = options.with_normalize(false);
        }
        options
    }
}

/// Initialize logging to stderr.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
pub fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathvet::Platform;
    use std::io::Write;

    fn rule_args() -> RuleArgs {
        RuleArgs {
            platform: None,
            min_len: None,
            max_len: None,
            max_path_len: None,
            fs_encoding: None,
            no_check_reserved: false,
            reserved: Vec::new(),
            allow_whitespace: false,
            config: None,
            json: false,
        }
    }

    #[test]
    fn test_flags_override_profile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "platform = \"linux\"\nmax_len = 100").unwrap();

        let mut args = rule_args();
        args.config = Some(file.path().to_path_buf());
        args.platform = Some("windows".to_string());
        args.reserved = vec!["tmp".to_string()];

        let profile = args.profile().unwrap();
        let config = args.validation_config(&profile).unwrap();
        assert_eq!(config.platform(), Platform::Windows);
        assert_eq!(config.max_name_len(), 100);
        assert!(!pathvet::is_valid_filename("TMP", &config));
    }

    #[test]
    fn test_invalid_settings_reported() {
        let mut args = rule_args();
        args.min_len = Some(50);
        args.max_len = Some(10);
        let err = args.validation_config(&Profile::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid validation settings"));
    }

    #[test]
    fn test_sanitize_flags_override_profile() {
        let args = SanitizeArgs {
            rules: rule_args(),
            replacement: Some("-".to_string()),
            null_value: None,
            reserved_name: Some(ReservedNamePolicy::PrependUnderscore),
            validate_after: true,
            no_normalize: true,
            values: vec!["x".to_string()],
        };
        let options = args.sanitize_options(&Profile::default());
        assert_eq!(options.replacement_text(), "-");
        assert!(options.validate_after_sanitize());
        assert!(!options.normalize());
    }
}
