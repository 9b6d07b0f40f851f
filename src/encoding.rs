//! Filesystem text encodings for byte-length accounting.
//!
//! Length limits are byte limits, and a byte count depends on how the target
//! filesystem stores names. Only Unicode encodings are supported: every
//! `&str` is encodable in each of them, so a length is always defined.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Encoding used by the target filesystem to store names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FsEncoding {
    /// UTF-8, the default.
    #[default]
    Utf8,
    /// UTF-16, either byte order (NTFS stores names this way).
    Utf16,
    /// UTF-32, either byte order.
    Utf32,
}

impl FsEncoding {
    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16 => "utf-16",
            Self::Utf32 => "utf-32",
        }
    }

    /// Number of bytes `c` occupies.
    #[must_use]
    pub fn char_len(self, c: char) -> usize {
        match self {
            Self::Utf8 => c.len_utf8(),
            Self::Utf16 => c.len_utf16() * 2,
            Self::Utf32 => 4,
        }
    }

    /// Number of bytes `text` occupies.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathvet::FsEncoding;
    ///
    /// assert_eq!(FsEncoding::Utf8.byte_len("abc"), 3);
    /// assert_eq!(FsEncoding::Utf8.byte_len("あ"), 3);
    /// assert_eq!(FsEncoding::Utf16.byte_len("あ"), 2);
    /// assert_eq!(FsEncoding::Utf32.byte_len("ab"), 8);
    /// ```
    #[must_use]
    pub fn byte_len(self, text: &str) -> usize {
        match self {
            Self::Utf8 => text.len(),
            _ => text.chars().map(|c| self.char_len(c)).sum(),
        }
    }

    /// Longest prefix of `text` that fits in `max_bytes`, never splitting a character.
    #[must_use]
    pub fn truncate(self, text: &str, max_bytes: usize) -> &str {
        let mut used = 0;
        for (idx, c) in text.char_indices() {
            used += self.char_len(c);
            if used > max_bytes {
                return &text[..idx];
            }
        }
        text
    }
}

impl fmt::Display for FsEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FsEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();

        match normalized.as_str() {
            "utf8" | "u8" => Ok(Self::Utf8),
            "utf16" | "utf16le" | "utf16be" | "u16" => Ok(Self::Utf16),
            "utf32" | "utf32le" | "utf32be" | "u32" => Ok(Self::Utf32),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for FsEncoding {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FsEncoding> for String {
    fn from(encoding: FsEncoding) -> Self {
        encoding.name().to_string()
    }
}
