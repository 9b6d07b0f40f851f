//! Target platform resolution.
//!
//! Every validation and sanitization call runs against exactly one
//! [`Platform`]. Callers name it loosely through a [`PlatformSelector`]:
//! an explicit enum value, a case-insensitive alias string, the literal
//! `"auto"` (probe the host OS), or nothing at all.
//!
//! Resolution is total: anything unrecognized falls back to
//! [`Platform::Universal`], the most conservative target.
//!
//! # Examples
//!
//! ```
//! use pathvet::{Platform, PlatformSelector};
//!
//! assert_eq!(Platform::from_alias("Win32"), Platform::Windows);
//! assert_eq!(Platform::from_alias(" darwin "), Platform::MacOS);
//! assert_eq!(Platform::from_alias("beos"), Platform::Universal);
//! assert_eq!(PlatformSelector::Unset.resolve(), Platform::Universal);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A target filesystem platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Platform {
    /// POSIX compatible. Absolute paths must use the POSIX form.
    #[serde(rename = "POSIX")]
    Posix,
    /// Synthetic most-restrictive target; anything valid here is valid everywhere.
    #[default]
    #[serde(rename = "universal")]
    Universal,
    #[serde(rename = "Linux")]
    Linux,
    #[serde(rename = "Windows")]
    Windows,
    #[serde(rename = "macOS")]
    MacOS,
}

impl Platform {
    /// All platforms, in declaration order.
    pub const ALL: [Platform; 5] = [
        Platform::Posix,
        Platform::Universal,
        Platform::Linux,
        Platform::Windows,
        Platform::MacOS,
    ];

    /// Canonical display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Posix => "POSIX",
            Self::Universal => "universal",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::MacOS => "macOS",
        }
    }

    /// Resolve a free-form alias.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// `"auto"` probes the host OS. Unknown names resolve to
    /// [`Platform::Universal`].
    #[must_use]
    pub fn from_alias(alias: &str) -> Self {
        let alias = alias.trim().to_lowercase();

        if alias == "auto" {
            return Self::host();
        }

        Self::from_os_name(&alias)
    }

    /// Map an OS name, as reported by a platform probe, to a platform.
    ///
    /// This is the mapping used by `"auto"`; it is public so callers can
    /// inject their own probe result instead of the compile-time host.
    #[must_use]
    pub fn from_os_name(os_name: &str) -> Self {
        let name = os_name.trim().to_lowercase();

        match name.as_str() {
            "posix" => Self::Posix,
            "linux" => Self::Linux,
            "mac" | "macos" | "darwin" => Self::MacOS,
            _ if name.starts_with("win") => Self::Windows,
            _ => Self::Universal,
        }
    }

    /// The platform this binary was compiled for.
    #[must_use]
    pub fn host() -> Self {
        let platform = Self::from_os_name(std::env::consts::OS);
        debug!(
            os = std::env::consts::OS,
            platform = %platform,
            "Resolved auto platform"
        );
        platform
    }

    /// True for POSIX, Linux and macOS.
    #[must_use]
    pub fn is_posix_family(self) -> bool {
        matches!(self, Self::Posix | Self::Linux | Self::MacOS)
    }

    /// True for Windows and universal, the targets that follow Windows naming rules.
    #[must_use]
    pub fn is_windows_like(self) -> bool {
        matches!(self, Self::Windows | Self::Universal)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_alias(s))
    }
}

/// A loosely-typed platform choice, resolved lazily with [`PlatformSelector::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum PlatformSelector {
    /// No preference; resolves to universal.
    #[default]
    Unset,
    /// Probe the host OS.
    Auto,
    /// A specific platform.
    Exact(Platform),
    /// A free-form alias such as `"win"` or `"darwin"`.
    Alias(String),
}

impl PlatformSelector {
    /// Resolve to a canonical platform. Never fails.
    #[must_use]
    pub fn resolve(&self) -> Platform {
        match self {
            Self::Unset => Platform::Universal,
            Self::Auto => Platform::host(),
            Self::Exact(platform) => *platform,
            Self::Alias(alias) => Platform::from_alias(alias),
        }
    }
}

impl From<Platform> for PlatformSelector {
    fn from(platform: Platform) -> Self {
        Self::Exact(platform)
    }
}

impl From<Option<Platform>> for PlatformSelector {
    fn from(platform: Option<Platform>) -> Self {
        platform.map_or(Self::Unset, Self::Exact)
    }
}

impl From<&str> for PlatformSelector {
    fn from(alias: &str) -> Self {
        if alias.trim().eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Alias(alias.to_string())
        }
    }
}

impl From<String> for PlatformSelector {
    fn from(alias: String) -> Self {
        Self::from(alias.as_str())
    }
}

impl From<&String> for PlatformSelector {
    fn from(alias: &String) -> Self {
        Self::from(alias.as_str())
    }
}
