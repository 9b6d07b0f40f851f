use tracing::debug;

use super::{FilenameSanitizer, normalize_lexically};
use crate::config::{SanitizeOptions, ValidationConfig};
use crate::error::ValidationError;
use crate::rules::PlatformRules;
use crate::validator::{FilepathValidator, check_absolute_path, is_null_value, split_drive};

/// Repairs a full file path segment by segment.
///
/// The drive or UNC prefix is kept verbatim and an absolute path of the
/// wrong shape for the platform is an error. The remainder is optionally
/// normalized, split on separators, and each segment is sanitized as a
/// filename. Segments that sanitize to nothing are dropped. A first segment
/// that is an NTFS metafile name once repaired gets a `_` suffix. The result
/// is joined with the platform separator; a leading separator survives only
/// if the input had one.
///
/// Paths are not truncated; only their segments are.
///
/// # Examples
///
/// ```
/// use pathvet::{FilepathSanitizer, Platform, SanitizeOptions, ValidationConfig};
///
/// let options = SanitizeOptions::default();
///
/// let universal = ValidationConfig::for_platform(Platform::Universal);
/// let sanitizer = FilepathSanitizer::new(&universal, &options);
/// assert_eq!(sanitizer.sanitize("a/b").unwrap(), "a/b");
/// assert_eq!(sanitizer.sanitize("dir/CON/x?.txt").unwrap(), "dir/CON_/x.txt");
///
/// let windows = ValidationConfig::for_platform(Platform::Windows);
/// let sanitizer = FilepathSanitizer::new(&windows, &options);
/// assert_eq!(sanitizer.sanitize("C:/tmp/./a|b").unwrap(), r"C:\tmp\ab");
/// ```
#[derive(Clone, Copy)]
pub struct FilepathSanitizer<'a> {
    config: &'a ValidationConfig,
    options: &'a SanitizeOptions,
    rules: &'static dyn PlatformRules,
    names: FilenameSanitizer<'a>,
}

impl<'a> FilepathSanitizer<'a> {
    #[must_use]
    pub fn new(config: &'a ValidationConfig, options: &'a SanitizeOptions) -> Self {
        Self {
            config,
            options,
            rules: config.rules(),
            names: FilenameSanitizer::new(config, options),
        }
    }

    /// Sanitize `value` into a valid file path.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an absolute path of the wrong shape,
    /// when a handler escalates, or when the post-sanitize check fails.
    pub fn sanitize(&self, value: &str) -> Result<String, ValidationError> {
        let platform = self.config.platform();

        if is_null_value(value, self.config) {
            return self.handle_null();
        }

        check_absolute_path(value, platform)?;

        let (drive, rest) = split_drive(value, platform);
        let mut rest = if platform.is_windows_like() {
            rest.replace('\\', "/")
        } else {
            rest.to_string()
        };
        if self.options.normalize() && !rest.is_empty() {
            rest = normalize_lexically(&rest);
        }

        let rooted = rest.starts_with('/');
        let mut segments: Vec<String> = Vec::new();

        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            if matches!(segment, "." | "..") {
                segments.push(segment.to_string());
                continue;
            }

            let sanitized = match self.names.repair(segment)? {
                Some(sanitized) if !matches!(sanitized.as_str(), "" | "." | "..") => sanitized,
                _ => {
                    debug!(platform = %platform, segment = segment, "Dropped empty segment");
                    continue;
                },
            };

            if segments.is_empty()
                && self.config.check_reserved()
                && self.rules.is_root_reserved_name(&sanitized)
            {
                debug!(platform = %platform, segment = %sanitized, "Suffixed NTFS metafile name");
                segments.push(format!("{sanitized}_"));
            } else {
                segments.push(sanitized);
            }
        }

        let separator = self.rules.path_separator().to_string();
        let mut sanitized = String::from(drive);
        if rooted {
            sanitized.push_str(&separator);
        }
        sanitized.push_str(&segments.join(&separator));

        if sanitized.is_empty() {
            return self.handle_null();
        }

        if self.options.validate_after_sanitize() {
            FilepathValidator::new(self.config)
                .validate(&sanitized)
                .map_err(|err| ValidationError::invalid_after_sanitize(platform, err))?;
        }

        Ok(sanitized)
    }

    fn handle_null(&self) -> Result<String, ValidationError> {
        debug!(
            platform = %self.config.platform(),
            "Null path, invoking null value handler"
        );
        self.options
            .null_value_handler()
            .handle(&ValidationError::null_name(self.config.platform()))
    }
}
