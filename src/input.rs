//! Path-like inputs.
//!
//! The public functions accept plain strings as well as `Path`, `OsStr` and
//! their owned forms. A sanitized value comes back in the same family it came
//! in: text in, `String` out; path in, `PathBuf` out; OS string in,
//! `OsString` out. `Option<T>` models an absent value, which is treated as a
//! null name.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Text view of an input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputText<'a> {
    /// No value at all.
    Absent,
    /// Valid Unicode.
    Text(Cow<'a, str>),
    /// Not valid Unicode; holds the lossy decoding with U+FFFD substitutions.
    Lossy(String),
}

/// A value that can be validated or sanitized as a filename or file path.
pub trait PathLike {
    /// Type produced by sanitizing this input.
    type Output;

    /// Borrow the value as text.
    fn as_input_text(&self) -> InputText<'_>;

    /// Wrap sanitized text in the output type.
    fn wrap_output(text: String) -> Self::Output;
}

impl PathLike for str {
    type Output = String;

    fn as_input_text(&self) -> InputText<'_> {
        InputText::Text(Cow::Borrowed(self))
    }

    fn wrap_output(text: String) -> Self::Output {
        text
    }
}

impl PathLike for String {
    type Output = String;

    fn as_input_text(&self) -> InputText<'_> {
        InputText::Text(Cow::Borrowed(self))
    }

    fn wrap_output(text: String) -> Self::Output {
        text
    }
}

impl PathLike for OsStr {
    type Output = OsString;

    fn as_input_text(&self) -> InputText<'_> {
        match self.to_str() {
            Some(text) => InputText::Text(Cow::Borrowed(text)),
            None => InputText::Lossy(self.to_string_lossy().into_owned()),
        }
    }

    fn wrap_output(text: String) -> Self::Output {
        OsString::from(text)
    }
}

impl PathLike for OsString {
    type Output = OsString;

    fn as_input_text(&self) -> InputText<'_> {
        self.as_os_str().as_input_text()
    }

    fn wrap_output(text: String) -> Self::Output {
        OsString::from(text)
    }
}

impl PathLike for Path {
    type Output = PathBuf;

    fn as_input_text(&self) -> InputText<'_> {
        self.as_os_str().as_input_text()
    }

    fn wrap_output(text: String) -> Self::Output {
        PathBuf::from(text)
    }
}

impl PathLike for PathBuf {
    type Output = PathBuf;

    fn as_input_text(&self) -> InputText<'_> {
        self.as_os_str().as_input_text()
    }

    fn wrap_output(text: String) -> Self::Output {
        PathBuf::from(text)
    }
}

impl<T: PathLike + ?Sized> PathLike for &T {
    type Output = T::Output;

    fn as_input_text(&self) -> InputText<'_> {
        (**self).as_input_text()
    }

    fn wrap_output(text: String) -> Self::Output {
        T::wrap_output(text)
    }
}

impl<T: PathLike> PathLike for Option<T> {
    type Output = T::Output;

    fn as_input_text(&self) -> InputText<'_> {
        match self {
            Some(value) => value.as_input_text(),
            None => InputText::Absent,
        }
    }

    fn wrap_output(text: String) -> Self::Output {
        T::wrap_output(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_inputs() {
        assert_eq!("abc".as_input_text(), InputText::Text(Cow::Borrowed("abc")));
        assert_eq!(
            String::from("abc").as_input_text(),
            InputText::Text(Cow::Borrowed("abc"))
        );
        assert_eq!(Path::new("a/b").as_input_text(), InputText::Text(Cow::Borrowed("a/b")));
    }

    #[test]
    fn test_option_inputs() {
        assert_eq!(None::<&str>.as_input_text(), InputText::Absent);
        assert_eq!(Some("x").as_input_text(), InputText::Text(Cow::Borrowed("x")));
    }

    #[test]
    fn test_output_mirrors_input() {
        let s: String = <&str as PathLike>::wrap_output("a".into());
        let p: PathBuf = <&Path as PathLike>::wrap_output("a".into());
        let o: OsString = <OsString as PathLike>::wrap_output("a".into());
        assert_eq!(s, "a");
        assert_eq!(p, PathBuf::from("a"));
        assert_eq!(o, OsString::from("a"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_is_lossy() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"ab\xffc");
        assert_eq!(raw.as_input_text(), InputText::Lossy("ab\u{fffd}c".to_string()));
    }
}
