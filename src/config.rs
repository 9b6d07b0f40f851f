//! Validation and sanitization settings.
//!
//! This module provides:
//!
//! - [`ValidationConfig`] - resolved, immutable limits for one target platform
//! - [`ValidationConfigBuilder`] - programmatic construction with fail-fast checks
//! - [`SanitizeOptions`] - replacement text and recovery handlers for the sanitizers
//! - [`Profile`] - a TOML description of both, used by the CLI
//!
//! Limits are normalized once at build time. A zero or missing length means
//! "platform default", a minimum below one is raised to one, and a maximum
//! above the platform default is clipped to it.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use crate::encoding::FsEncoding;
use crate::handler::{
    NullValueHandler, NullValuePolicy, ReservedNameHandler, ReservedNamePolicy,
};
use crate::platform::{Platform, PlatformSelector};
use crate::rules::{DEFAULT_MIN_LEN, PlatformRules, RuleSet, rules_for};

/// Configuration errors raised while building a [`ValidationConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The minimum length exceeds the effective maximum name length.
    #[error("min_len ({min_len}) cannot be greater than max_len ({max_len})")]
    MinExceedsMax { min_len: usize, max_len: usize },

    /// The filesystem encoding name is not recognized.
    #[error("unknown filesystem encoding: {0}")]
    UnknownEncoding(String),
}

impl ConfigError {
    /// Create a min/max conflict error.
    pub fn min_exceeds_max(min_len: usize, max_len: usize) -> Self {
        Self::MinExceedsMax { min_len, max_len }
    }
}

/// Resolved settings shared by validators and sanitizers.
///
/// Cheap to clone and safe to share between threads; nothing is mutated
/// after [`ValidationConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    platform: Platform,
    rules: &'static RuleSet,
    min_len: usize,
    max_name_len: usize,
    max_path_len: usize,
    fs_encoding: FsEncoding,
    check_reserved: bool,
    additional_reserved_names: BTreeSet<String>,
    allow_whitespace_name: bool,
}

impl ValidationConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// Platform defaults for `platform`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathvet::{Platform, ValidationConfig};
    ///
    /// let config = ValidationConfig::for_platform("win");
    /// assert_eq!(config.platform(), Platform::Windows);
    /// assert_eq!(config.max_path_len(), 260);
    /// assert_eq!(config.max_name_len(), 255);
    /// ```
    #[must_use]
    pub fn for_platform(platform: impl Into<PlatformSelector>) -> Self {
        Self::defaults(platform.into().resolve())
    }

    fn defaults(platform: Platform) -> Self {
        let rules = rules_for(platform);
        Self {
            platform,
            rules,
            min_len: DEFAULT_MIN_LEN,
            max_name_len: rules.default_max_name_len(),
            max_path_len: rules.default_max_path_len(),
            fs_encoding: FsEncoding::default(),
            check_reserved: true,
            additional_reserved_names: BTreeSet::new(),
            allow_whitespace_name: false,
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Rule table for the resolved platform.
    #[must_use]
    pub fn rules(&self) -> &'static dyn PlatformRules {
        self.rules
    }

    #[must_use]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    #[must_use]
    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    #[must_use]
    pub fn max_path_len(&self) -> usize {
        self.max_path_len
    }

    #[must_use]
    pub fn fs_encoding(&self) -> FsEncoding {
        self.fs_encoding
    }

    #[must_use]
    pub fn check_reserved(&self) -> bool {
        self.check_reserved
    }

    /// Caller-defined reserved names, uppercased.
    pub fn additional_reserved_names(&self) -> impl Iterator<Item = &str> {
        self.additional_reserved_names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn allow_whitespace_name(&self) -> bool {
        self.allow_whitespace_name
    }

    /// True if `upper` is reserved by the platform or by the caller.
    pub(crate) fn is_reserved(&self, upper: &str) -> bool {
        self.rules.is_reserved_name(upper) || self.additional_reserved_names.contains(upper)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::defaults(Platform::default())
    }
}

/// Builder for [`ValidationConfig`].
///
/// # Examples
///
/// ```
/// use pathvet::{FsEncoding, Platform, ValidationConfig};
///
/// let config = ValidationConfig::builder()
///     .platform(Platform::Linux)
///     .max_name_len(64)
///     .fs_encoding(FsEncoding::Utf16)
///     .additional_reserved_names(["tmp"])
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_name_len(), 64);
/// assert_eq!(config.additional_reserved_names().collect::<Vec<_>>(), ["TMP"]);
///
/// assert!(ValidationConfig::builder().min_len(10).max_name_len(5).build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationConfigBuilder {
    platform: PlatformSelector,
    min_len: Option<usize>,
    max_name_len: Option<usize>,
    max_path_len: Option<usize>,
    fs_encoding: Option<FsEncoding>,
    check_reserved: Option<bool>,
    additional_reserved_names: Vec<String>,
    allow_whitespace_name: bool,
}

impl ValidationConfigBuilder {
    #[must_use]
    pub fn platform(mut self, platform: impl Into<PlatformSelector>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Minimum byte length. Zero is raised to one.
    #[must_use]
    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    /// Maximum byte length of a single name. Zero means the platform default.
    #[must_use]
    pub fn max_name_len(mut self, max_len: usize) -> Self {
        self.max_name_len = Some(max_len);
        self
    }

    /// Maximum byte length of a full path. Zero means the platform default.
    #[must_use]
    pub fn max_path_len(mut self, max_len: usize) -> Self {
        self.max_path_len = Some(max_len);
        self
    }

    #[must_use]
    pub fn fs_encoding(mut self, encoding: FsEncoding) -> Self {
        self.fs_encoding = Some(encoding);
        self
    }

    /// Enable or disable reserved-name checks. On by default.
    #[must_use]
    pub fn check_reserved(mut self, enabled: bool) -> Self {
        self.check_reserved = Some(enabled);
        self
    }

    /// Extra reserved names, compared case-insensitively.
    #[must_use]
    pub fn additional_reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.additional_reserved_names
            .extend(names.into_iter().map(|n| n.as_ref().to_string()));
        self
    }

    /// Accept whitespace-only names on POSIX-family platforms.
    #[must_use]
    pub fn allow_whitespace_name(mut self, allow: bool) -> Self {
        self.allow_whitespace_name = allow;
        self
    }

    /// Resolve the platform and normalize the limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MinExceedsMax`] when the minimum length is
    /// greater than the effective maximum name length.
    pub fn build(self) -> Result<ValidationConfig, ConfigError> {
        let mut config = ValidationConfig::defaults(self.platform.resolve());
        let rules = config.rules;

        config.max_path_len = match self.max_path_len {
            None | Some(0) => rules.default_max_path_len(),
            Some(n) => n.min(rules.default_max_path_len()),
        };
        config.max_name_len = match self.max_name_len {
            None | Some(0) => rules.default_max_name_len(),
            Some(n) => n,
        }
        .min(config.max_path_len);
        config.min_len = self.min_len.unwrap_or(DEFAULT_MIN_LEN).max(DEFAULT_MIN_LEN);

        if config.min_len > config.max_name_len {
            return Err(ConfigError::min_exceeds_max(config.min_len, config.max_name_len));
        }

        config.fs_encoding = self.fs_encoding.unwrap_or_default();
        config.check_reserved = self.check_reserved.unwrap_or(true);
        config.additional_reserved_names = self
            .additional_reserved_names
            .iter()
            .map(|n| n.to_uppercase())
            .collect();
        config.allow_whitespace_name = self.allow_whitespace_name;

        Ok(config)
    }
}

/// Settings that only the sanitizers need.
///
/// Defaults: empty replacement text, [`NullValuePolicy::ReturnEmpty`],
/// [`ReservedNamePolicy::AppendUnderscore`], no post-sanitize check, and
/// path normalization on.
#[derive(Clone)]
pub struct SanitizeOptions {
    replacement_text: String,
    null_value_handler: Arc<dyn NullValueHandler>,
    reserved_name_handler: Arc<dyn ReservedNameHandler>,
    validate_after_sanitize: bool,
    normalize: bool,
}

impl SanitizeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text substituted for every forbidden character.
    #[must_use]
    pub fn with_replacement_text(mut self, text: impl Into<String>) -> Self {
        self.replacement_text = text.into();
        self
    }

    #[must_use]
    pub fn with_null_value_handler(mut self, handler: impl NullValueHandler + 'static) -> Self {
        self.null_value_handler = Arc::new(handler);
        self
    }

    #[must_use]
    pub fn with_reserved_name_handler(
        mut self,
        handler: impl ReservedNameHandler + 'static,
    ) -> Self {
        self.reserved_name_handler = Arc::new(handler);
        self
    }

    /// Re-validate the final candidate and fail with `InvalidAfterSanitize`.
    #[must_use]
    pub fn with_validate_after_sanitize(mut self, enabled: bool) -> Self {
        self.validate_after_sanitize = enabled;
        self
    }

    /// Lexically collapse `.`, empty segments and `dir/..` before sanitizing a path.
    #[must_use]
    pub fn with_normalize(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    #[must_use]
    pub fn replacement_text(&self) -> &str {
        &self.replacement_text
    }

    #[must_use]
    pub fn null_value_handler(&self) -> &dyn NullValueHandler {
        self.null_value_handler.as_ref()
    }

    #[must_use]
    pub fn reserved_name_handler(&self) -> &dyn ReservedNameHandler {
        self.reserved_name_handler.as_ref()
    }

    #[must_use]
    pub fn validate_after_sanitize(&self) -> bool {
        self.validate_after_sanitize
    }

    #[must_use]
    pub fn normalize(&self) -> bool {
        self.normalize
    }
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            replacement_text: String::new(),
            null_value_handler: Arc::new(NullValuePolicy::default()),
            reserved_name_handler: Arc::new(ReservedNamePolicy::default()),
            validate_after_sanitize: false,
            normalize: true,
        }
    }
}

impl fmt::Debug for SanitizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizeOptions")
            .field("replacement_text", &self.replacement_text)
            .field("validate_after_sanitize", &self.validate_after_sanitize)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

/// TOML profile describing a [`ValidationConfig`] and [`SanitizeOptions`].
///
/// Every key is optional:
///
/// ```toml
/// platform = "windows"
/// min_len = 1
/// max_len = 128
/// max_path_len = 0
/// fs_encoding = "utf-16"
/// check_reserved = true
/// additional_reserved_names = ["TMP"]
/// allow_whitespace_name = false
///
/// [sanitize]
/// replacement_text = "_"
/// null_value = "timestamp"
/// reserved_name = "prepend"
/// validate_after_sanitize = true
/// normalize = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub platform: PlatformSelector,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub max_path_len: Option<usize>,
    pub fs_encoding: Option<FsEncoding>,
    pub check_reserved: Option<bool>,
    pub additional_reserved_names: Vec<String>,
    pub allow_whitespace_name: bool,
    pub sanitize: SanitizeProfile,
}

/// The `[sanitize]` table of a [`Profile`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SanitizeProfile {
    pub replacement_text: String,
    pub null_value: NullValuePolicy,
    pub reserved_name: ReservedNamePolicy,
    pub validate_after_sanitize: bool,
    pub normalize: bool,
}

impl Default for SanitizeProfile {
    fn default() -> Self {
        Self {
            replacement_text: String::new(),
            null_value: NullValuePolicy::default(),
            reserved_name: ReservedNamePolicy::default(),
            validate_after_sanitize: false,
            normalize: true,
        }
    }
}

impl Profile {
    /// Load a profile from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - A key has the wrong type or an unknown encoding name
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;

        let profile: Profile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse profile: {}", path.display()))?;

        Ok(profile)
    }

    /// Builder pre-filled from this profile, for further overrides.
    #[must_use]
    pub fn builder(&self) -> ValidationConfigBuilder {
        let mut builder = ValidationConfig::builder()
            .platform(self.platform.clone())
            .additional_reserved_names(&self.additional_reserved_names)
            .allow_whitespace_name(self.allow_whitespace_name);

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
        if let Some(check) = self.check_reserved {
            builder = builder.check_reserved(check);
        }
        builder
    }

    /// Resolve the validation settings.
    ///
    /// # Errors
    ///
    /// See [`ValidationConfigBuilder::build`].
    pub fn validation_config(&self) -> Result<ValidationConfig, ConfigError> {
        self.builder().build()
    }

    /// Sanitizer settings from the `[sanitize]` table.
    #[must_use]
    pub fn sanitize_options(&self) -> SanitizeOptions {
        let sanitize = &self.sanitize;
        SanitizeOptions::new()
            .with_replacement_text(sanitize.replacement_text.clone())
            .with_null_value_handler(sanitize.null_value)
            .with_reserved_name_handler(sanitize.reserved_name)
            .with_validate_after_sanitize(sanitize.validate_after_sanitize)
            .with_normalize(sanitize.normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // =========================================================================
    // BUILDER TESTS
    // =========================================================================

    #[test]
    fn test_defaults_per_platform() {
        let linux = ValidationConfig::for_platform(Platform::Linux);
        assert_eq!(linux.max_path_len(), 4096);
        assert_eq!(linux.max_name_len(), 255);
        assert_eq!(linux.min_len(), 1);
        assert!(linux.check_reserved());

        let mac = ValidationConfig::for_platform("darwin");
        assert_eq!(mac.max_path_len(), 1024);

        let universal = ValidationConfig::default();
        assert_eq!(universal.platform(), Platform::Universal);
        assert_eq!(universal.max_path_len(), 260);
        assert_eq!(universal.fs_encoding(), FsEncoding::Utf8);
    }

    #[test]
    fn test_zero_lengths_mean_default() {
        let config = ValidationConfig::builder()
            .platform(Platform::Windows)
            .min_len(0)
            .max_name_len(0)
            .max_path_len(0)
            .build()
            .unwrap();
        assert_eq!(config.min_len(), 1);
        assert_eq!(config.max_name_len(), 255);
        assert_eq!(config.max_path_len(), 260);
    }

    #[test]
    fn test_lengths_are_clipped() {
        let config = ValidationConfig::builder()
            .platform(Platform::Windows)
            .max_path_len(10_000)
            .build()
            .unwrap();
        assert_eq!(config.max_path_len(), 260);

        let config = ValidationConfig::builder()
            .platform(Platform::Linux)
            .max_path_len(100)
            .max_name_len(300)
            .build()
            .unwrap();
        assert_eq!(config.max_path_len(), 100);
        assert_eq!(config.max_name_len(), 100);
    }

    #[test]
    fn test_min_exceeds_max_fails_fast() {
        let err = ValidationConfig::builder()
            .min_len(20)
            .max_name_len(10)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::min_exceeds_max(20, 10));
        assert_eq!(err.to_string(), "min_len (20) cannot be greater than max_len (10)");
    }

    #[test]
    fn test_additional_reserved_names_case_insensitive() {
        let config = ValidationConfig::builder()
            .platform(Platform::Linux)
            .additional_reserved_names(["Temp", "scratch"])
            .build()
            .unwrap();
        assert!(config.is_reserved("TEMP"));
        assert!(config.is_reserved("SCRATCH"));
        assert!(config.is_reserved(".."));
        assert!(!config.is_reserved("CON"));
    }

    // =========================================================================
    // SANITIZE OPTIONS TESTS
    // =========================================================================

    #[test]
    fn test_sanitize_option_defaults() {
        let options = SanitizeOptions::default();
        assert_eq!(options.replacement_text(), "");
        assert!(!options.validate_after_sanitize());
        assert!(options.normalize());

        let err = ValidationError::null_name(Platform::Linux);
        assert_eq!(options.null_value_handler().handle(&err).unwrap(), "");

        let err = ValidationError::reserved(Platform::Windows, "CON", false);
        assert_eq!(options.reserved_name_handler().handle(&err).unwrap(), "CON_");
    }

    #[test]
    fn test_sanitize_options_accept_closures() {
        let options = SanitizeOptions::new()
            .with_null_value_handler(|_: &ValidationError| -> Result<String, ValidationError> {
                Ok("untitled".to_string())
            });
        let err = ValidationError::null_name(Platform::Linux);
        assert_eq!(options.null_value_handler().handle(&err).unwrap(), "untitled");
    }

    // =========================================================================
    // PROFILE TESTS
    // =========================================================================

    #[test]
    fn test_parse_empty_profile() {
        let profile: Profile = toml::from_str("").unwrap();
        let config = profile.validation_config().unwrap();
        assert_eq!(config.platform(), Platform::Universal);
        assert!(profile.sanitize_options().normalize());
    }

    #[test]
    fn test_parse_full_profile() {
        let toml_str = r#"
platform = "win"
min_len = 2
max_len = 64
fs_encoding = "utf-16"
check_reserved = false
additional_reserved_names = ["tmp"]

[sanitize]
replacement_text = "_"
null_value = "error"
reserved_name = "prepend"
validate_after_sanitize = true
normalize = false
"#;
        let profile: Profile = toml::from_str(toml_str).unwrap();
        let config = profile.validation_config().unwrap();
        assert_eq!(config.platform(), Platform::Windows);
        assert_eq!(config.min_len(), 2);
        assert_eq!(config.max_name_len(), 64);
        assert_eq!(config.fs_encoding(), FsEncoding::Utf16);
        assert!(!config.check_reserved());
        assert!(config.is_reserved("TMP"));

        let options = profile.sanitize_options();
        assert_eq!(options.replacement_text(), "_");
        assert!(options.validate_after_sanitize());
        assert!(!options.normalize());
        let err = ValidationError::null_name(Platform::Windows);
        assert!(options.null_value_handler().handle(&err).is_err());
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let result: Result<Profile, _> = toml::from_str("fs_encoding = \"ebcdic\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "platform = \"linux\"\nmax_len = 32").unwrap();

        let profile = Profile::load_from(file.path()).unwrap();
        let config = profile.validation_config().unwrap();
        assert_eq!(config.platform(), Platform::Linux);
        assert_eq!(config.max_name_len(), 32);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Profile::load_from(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read profile"));
    }
}
