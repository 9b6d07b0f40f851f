//! Filename and file path sanitizers.
//!
//! A sanitizer turns an arbitrary string into one that passes the matching
//! validator. Character defects are fixed by substitution; reserved names,
//! empty results and Windows boundary characters go through the recovery
//! handlers in [`SanitizeOptions`](crate::SanitizeOptions). Absolute-path
//! shape errors are never repaired.

mod name;
mod path;

pub use name::FilenameSanitizer;
pub use path::FilepathSanitizer;

/// Upper bound on recovery rounds for one name.
///
/// Each round either fixes a defect or returns, so this only guards against
/// handlers that keep producing reserved names.
const MAX_RECOVERY_ROUNDS: usize = 8;

/// Collapse `.`, empty segments and `dir/..` pairs in a `/`-separated path.
///
/// Leading `..` segments of a relative path are kept. `..` directly under
/// the root is dropped. An empty result becomes `.`.
///
/// # Examples
///
/// ```
/// use pathvet::sanitizer::normalize_lexically;
///
/// assert_eq!(normalize_lexically("a//b/./c/../d"), "a/b/d");
/// assert_eq!(normalize_lexically("../a/.."), "..");
/// assert_eq!(normalize_lexically("/../a"), "/a");
/// assert_eq!(normalize_lexically("a/.."), ".");
/// ```
#[must_use]
pub fn normalize_lexically(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            },
            _ => parts.push(segment),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
