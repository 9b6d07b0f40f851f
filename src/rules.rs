//! Per-platform rule table.
//!
//! Each [`Platform`] has exactly one [`RuleSet`], built lazily on first use
//! and shared read-only afterwards. Validators and sanitizers never build
//! rules per call; they ask [`rules_for`] and hold the `&'static` result
//! through the [`PlatformRules`] capability trait.
//!
//! # Character sets
//!
//! | Platform            | Forbidden in a path                         | Extra in a name |
//! |---------------------|---------------------------------------------|-----------------|
//! | POSIX, Linux, macOS | NUL                                         | `/`             |
//! | Windows, universal  | ASCII controls, DEL, `: * ? " < > \|`       | `/`, `\`        |
//!
//! A path permits its separator; a name does not, so the name set is never a
//! subset of the path set.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::platform::Platform;

/// Default maximum byte length of a single name on every platform.
pub const DEFAULT_MAX_NAME_LEN: usize = 255;

/// Smallest accepted minimum length.
pub const DEFAULT_MIN_LEN: usize = 1;

/// Reserved Windows device names.
///
/// Windows treats these as devices regardless of extension:
/// - `CON`, `PRN`, `AUX`, `CLOCK$`, `NUL`
/// - `COM1` through `COM9`
/// - `LPT1` through `LPT9`
pub const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "CLOCK$", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
    "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// NTFS metafile names. Reserved only directly under a volume root.
pub const NTFS_RESERVED_NAMES: &[&str] = &[
    "$Mft", "$MftMirr", "$LogFile", "$Volume", "$AttrDef", "$Bitmap", "$Boot", "$BadClus",
    "$Secure", "$Upcase", "$Extend", "$Quota", "$ObjId", "$Reparse",
];

/// Directory self/parent references.
pub const DOT_NAMES: &[&str] = &[".", ".."];

/// Historical classic Mac OS separator, reserved as a whole name.
pub const MACOS_RESERVED_NAMES: &[&str] = &[":"];

/// Windows characters forbidden anywhere in a path, beyond the control range.
const WINDOWS_PATH_SYMBOLS: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Capability interface answering "what does this platform allow?".
pub trait PlatformRules: Send + Sync {
    /// The platform these rules describe.
    fn platform(&self) -> Platform;

    /// True if `c` may not appear in a single path component.
    fn is_forbidden_in_name(&self, c: char) -> bool;

    /// True if `c` may not appear in a full path (separators allowed).
    fn is_forbidden_in_path(&self, c: char) -> bool;

    /// True if `upper` (already uppercased) is a reserved component name.
    fn is_reserved_name(&self, upper: &str) -> bool;

    /// True if `name` is an NTFS metafile name reserved at the volume root.
    fn is_root_reserved_name(&self, name: &str) -> bool;

    /// Platform default for the maximum byte length of a name.
    fn default_max_name_len(&self) -> usize;

    /// Platform default for the maximum byte length of a path.
    fn default_max_path_len(&self) -> usize;

    /// Separator used when joining sanitized path segments.
    fn path_separator(&self) -> char;

    /// True if `c` separates path segments on input.
    fn is_separator(&self, c: char) -> bool;

    /// True if `X:` drives and `\\server\share` prefixes are valid path roots.
    fn has_drive_prefixes(&self) -> bool;

    /// True if names may not start with a space or end with a space or period.
    fn restricts_name_boundaries(&self) -> bool;
}

/// Immutable rule bundle for one platform.
#[derive(Debug)]
pub struct RuleSet {
    platform: Platform,
    forbidden_path_chars: BTreeSet<char>,
    forbidden_name_chars: BTreeSet<char>,
    reserved_names: BTreeSet<String>,
    root_reserved_names: BTreeSet<String>,
    max_name_len: usize,
    max_path_len: usize,
    separator: char,
}

impl RuleSet {
    fn new(platform: Platform) -> Self {
        let windows_like = platform.is_windows_like();

        let mut forbidden_path_chars = BTreeSet::from(['\0']);
        if windows_like {
            forbidden_path_chars.extend('\u{0}'..='\u{1f}');
            forbidden_path_chars.insert('\u{7f}');
            forbidden_path_chars.extend(WINDOWS_PATH_SYMBOLS);
        }

        let mut forbidden_name_chars = forbidden_path_chars.clone();
        forbidden_name_chars.insert('/');
        if windows_like {
            forbidden_name_chars.insert('\\');
        }

        let mut reserved: Vec<&str> = DOT_NAMES.to_vec();
        match platform {
            Platform::Windows => reserved.extend(WINDOWS_RESERVED_NAMES),
            Platform::Universal => {
                reserved.extend(WINDOWS_RESERVED_NAMES);
                reserved.extend(MACOS_RESERVED_NAMES);
            },
            Platform::Posix | Platform::MacOS => reserved.extend(MACOS_RESERVED_NAMES),
            Platform::Linux => {},
        }

        let root_reserved_names = if windows_like {
            NTFS_RESERVED_NAMES.iter().map(|n| n.to_uppercase()).collect()
        } else {
            BTreeSet::new()
        };

        let max_path_len = match platform {
            Platform::Linux => 4096,
            Platform::MacOS | Platform::Posix => 1024,
            Platform::Windows | Platform::Universal => 260,
        };

        Self {
            platform,
            forbidden_path_chars,
            forbidden_name_chars,
            reserved_names: reserved.iter().map(|n| n.to_uppercase()).collect(),
            root_reserved_names,
            max_name_len: DEFAULT_MAX_NAME_LEN.min(max_path_len),
            max_path_len,
            separator: if platform == Platform::Windows {
                '\\'
            } else {
                '/'
            },
        }
    }

    /// Reserved component names, uppercased.
    pub fn reserved_names(&self) -> impl Iterator<Item = &str> {
        self.reserved_names.iter().map(String::as_str)
    }

    /// Characters forbidden in a name.
    pub fn forbidden_name_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.forbidden_name_chars.iter().copied()
    }

    /// Characters forbidden in a path.
    pub fn forbidden_path_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.forbidden_path_chars.iter().copied()
    }
}

impl PlatformRules for RuleSet {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn is_forbidden_in_name(&self, c: char) -> bool {
        self.forbidden_name_chars.contains(&c)
    }

    fn is_forbidden_in_path(&self, c: char) -> bool {
        self.forbidden_path_chars.contains(&c)
    }

    fn is_reserved_name(&self, upper: &str) -> bool {
        self.reserved_names.contains(upper)
    }

    fn is_root_reserved_name(&self, name: &str) -> bool {
        !self.root_reserved_names.is_empty()
            && self.root_reserved_names.contains(&name.to_uppercase())
    }

    fn default_max_name_len(&self) -> usize {
        self.max_name_len
    }

    fn default_max_path_len(&self) -> usize {
        self.max_path_len
    }

    fn path_separator(&self) -> char {
        self.separator
    }

    fn is_separator(&self, c: char) -> bool {
        c == '/' || (self.platform.is_windows_like() && c == '\\')
    }

    fn has_drive_prefixes(&self) -> bool {
        self.platform == Platform::Windows
    }

    fn restricts_name_boundaries(&self) -> bool {
        self.platform.is_windows_like()
    }
}

static POSIX_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::new(Platform::Posix));
static UNIVERSAL_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::new(Platform::Universal));
static LINUX_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::new(Platform::Linux));
static WINDOWS_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::new(Platform::Windows));
static MACOS_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::new(Platform::MacOS));

/// Look up the shared rule set for a platform.
#[must_use]
pub fn rules_for(platform: Platform) -> &'static RuleSet {
    match platform {
        Platform::Posix => &POSIX_RULES,
        Platform::Universal => &UNIVERSAL_RULES,
        Platform::Linux => &LINUX_RULES,
        Platform::Windows => &WINDOWS_RULES,
        Platform::MacOS => &MACOS_RULES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // CHARACTER SET TESTS
    // =========================================================================

    #[test]
    fn test_posix_family_forbids_only_nul_and_slash() {
        for platform in [Platform::Posix, Platform::Linux, Platform::MacOS] {
            let rules = rules_for(platform);
            assert!(rules.is_forbidden_in_path('\0'));
            assert!(!rules.is_forbidden_in_path('/'));
            assert!(rules.is_forbidden_in_name('/'));
            for c in [':', '*', '?', '"', '<', '>', '|', '\\', '\t', '\n'] {
                assert!(!rules.is_forbidden_in_name(c), "{platform} should allow {c:?}");
            }
        }
    }

    #[test]
    fn test_windows_like_forbidden_chars() {
        for platform in [Platform::Windows, Platform::Universal] {
            let rules = rules_for(platform);
            for c in ['\0', '\u{1}', '\t', '\n', '\u{b}', '\r', '\u{1f}', '\u{7f}'] {
                assert!(rules.is_forbidden_in_path(c), "{platform} should forbid {c:?}");
            }
            for c in WINDOWS_PATH_SYMBOLS {
                assert!(rules.is_forbidden_in_path(*c));
                assert!(rules.is_forbidden_in_name(*c));
            }
            assert!(!rules.is_forbidden_in_path('/'));
            assert!(!rules.is_forbidden_in_path('\\'));
            assert!(rules.is_forbidden_in_name('/'));
            assert!(rules.is_forbidden_in_name('\\'));
            assert!(!rules.is_forbidden_in_name(' '));
            assert!(!rules.is_forbidden_in_name('.'));
        }
    }

    #[test]
    fn test_name_set_is_path_set_plus_separators() {
        for platform in Platform::ALL {
            let rules = rules_for(platform);
            let path: BTreeSet<char> = rules.forbidden_path_chars().collect();
            let name: BTreeSet<char> = rules.forbidden_name_chars().collect();
            assert!(path.is_subset(&name));
            assert!(name.difference(&path).all(|c| rules.is_separator(*c)));
        }
    }

    // =========================================================================
    // RESERVED NAME TESTS
    // =========================================================================

    #[test]
    fn test_reserved_names_per_platform() {
        let windows = rules_for(Platform::Windows);
        for name in WINDOWS_RESERVED_NAMES {
            assert!(windows.is_reserved_name(name));
        }
        assert!(windows.is_reserved_name("."));
        assert!(windows.is_reserved_name(".."));
        assert!(!windows.is_reserved_name(":"));
        assert!(!windows.is_reserved_name("COM10"));

        let universal = rules_for(Platform::Universal);
        assert!(universal.is_reserved_name("CLOCK$"));
        assert!(universal.is_reserved_name(":"));

        let linux = rules_for(Platform::Linux);
        assert!(linux.is_reserved_name(".."));
        assert!(!linux.is_reserved_name("CON"));
        assert!(!linux.is_reserved_name(":"));

        for platform in [Platform::Posix, Platform::MacOS] {
            let rules = rules_for(platform);
            assert!(rules.is_reserved_name(":"));
            assert!(!rules.is_reserved_name("NUL"));
        }
    }

    #[test]
    fn test_ntfs_root_names() {
        let windows = rules_for(Platform::Windows);
        assert!(windows.is_root_reserved_name("$Mft"));
        assert!(windows.is_root_reserved_name("$mft"));
        assert!(windows.is_root_reserved_name("$LOGFILE"));
        assert!(!windows.is_root_reserved_name("$Mft.txt"));
        assert!(rules_for(Platform::Universal).is_root_reserved_name("$Boot"));
        assert!(!rules_for(Platform::Linux).is_root_reserved_name("$Mft"));
    }

    // =========================================================================
    // LENGTH AND SEPARATOR TESTS
    // =========================================================================

    #[test]
    fn test_default_lengths() {
        assert_eq!(rules_for(Platform::Linux).default_max_path_len(), 4096);
        assert_eq!(rules_for(Platform::MacOS).default_max_path_len(), 1024);
        assert_eq!(rules_for(Platform::Posix).default_max_path_len(), 1024);
        assert_eq!(rules_for(Platform::Windows).default_max_path_len(), 260);
        assert_eq!(rules_for(Platform::Universal).default_max_path_len(), 260);
        for platform in Platform::ALL {
            assert_eq!(rules_for(platform).default_max_name_len(), 255);
        }
    }

    #[test]
    fn test_separators() {
        assert_eq!(rules_for(Platform::Windows).path_separator(), '\\');
        assert_eq!(rules_for(Platform::Universal).path_separator(), '/');
        assert_eq!(rules_for(Platform::Linux).path_separator(), '/');
        assert!(rules_for(Platform::Universal).is_separator('\\'));
        assert!(!rules_for(Platform::Linux).is_separator('\\'));
        assert!(rules_for(Platform::Windows).has_drive_prefixes());
        assert!(!rules_for(Platform::Universal).has_drive_prefixes());
    }

    #[test]
    fn test_rules_are_shared() {
        assert!(std::ptr::eq(
            rules_for(Platform::Windows),
            rules_for(Platform::Windows)
        ));
        assert_eq!(rules_for(Platform::MacOS).platform(), Platform::MacOS);
    }
}
