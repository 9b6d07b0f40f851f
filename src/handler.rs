//! Recovery strategies used by the sanitizers.
//!
//! Substitution fixes character-level defects. Two structural defects need a
//! policy instead:
//!
//! - the whole input is empty, or becomes empty ([`NullValueHandler`])
//! - the candidate collides with a reserved name ([`ReservedNameHandler`])
//!
//! Both are stateless functions of the triggering [`ValidationError`].
//! Closures with the right signature implement the traits, so callers can
//! plug in their own without a wrapper type.
//!
//! # Examples
//!
//! ```
//! use pathvet::{NullValueHandler, NullValuePolicy, ValidationError, Platform};
//!
//! let err = ValidationError::null_name(Platform::Linux);
//! assert_eq!(NullValuePolicy::ReturnEmpty.handle(&err).unwrap(), "");
//! assert!(NullValuePolicy::RaiseError.handle(&err).is_err());
//!
//! let fallback = |_: &ValidationError| Ok::<_, ValidationError>("untitled".to_string());
//! assert_eq!(fallback.handle(&err).unwrap(), "untitled");
//! ```

use chrono::Utc;
use serde::Deserialize;

use crate::error::ValidationError;

/// Decides what an empty value sanitizes to.
pub trait NullValueHandler: Send + Sync {
    /// Produce a replacement value, or fail.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the policy refuses to recover.
    fn handle(&self, err: &ValidationError) -> Result<String, ValidationError>;
}

/// Decides what a reserved name is rewritten to.
pub trait ReservedNameHandler: Send + Sync {
    /// Produce the replacement for the reserved token in `err`, or fail.
    ///
    /// Returning the token unchanged leaves the candidate as it is.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the policy refuses to recover.
    fn handle(&self, err: &ValidationError) -> Result<String, ValidationError>;
}

impl<F> NullValueHandler for F
where
    F: Fn(&ValidationError) -> Result<String, ValidationError> + Send + Sync,
{
    fn handle(&self, err: &ValidationError) -> Result<String, ValidationError> {
        self(err)
    }
}

impl<F> ReservedNameHandler for F
where
    F: Fn(&ValidationError) -> Result<String, ValidationError> + Send + Sync,
{
    fn handle(&self, err: &ValidationError) -> Result<String, ValidationError> {
        self(err)
    }
}

/// Built-in null value strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NullValuePolicy {
    /// Return an empty string.
    #[default]
    #[value(name = "empty")]
    #[serde(alias = "empty")]
    ReturnEmpty,
    /// Return the current Unix time as `seconds.microseconds`.
    #[value(name = "timestamp")]
    #[serde(alias = "timestamp")]
    ReturnTimestamp,
    /// Fail with the triggering error.
    #[value(name = "error")]
    #[serde(alias = "error")]
    RaiseError,
}

impl NullValueHandler for NullValuePolicy {
    fn handle(&self, err: &ValidationError) -> Result<String, ValidationError> {
        match self {
            Self::ReturnEmpty => Ok(String::new()),
            Self::ReturnTimestamp => Ok(timestamp()),
            Self::RaiseError => Err(err.clone()),
        }
    }
}

/// Built-in reserved name strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReservedNamePolicy {
    /// `CON` becomes `CON_`.
    #[default]
    #[value(name = "append")]
    #[serde(alias = "append")]
    AppendUnderscore,
    /// `CON` becomes `_CON`.
    #[value(name = "prepend")]
    #[serde(alias = "prepend")]
    PrependUnderscore,
    /// Leave the name unchanged.
    #[value(name = "as-is")]
    AsIs,
    /// Fail with the triggering error.
    #[value(name = "error")]
    #[serde(alias = "error")]
    RaiseError,
}

impl ReservedNameHandler for ReservedNamePolicy {
    fn handle(&self, err: &ValidationError) -> Result<String, ValidationError> {
        let reserved = err.reserved_name().unwrap_or_default();

        if err.reusable_name() == Some(true) || matches!(reserved, "." | "..") {
            return Ok(reserved.to_string());
        }

        match self {
            Self::AppendUnderscore => Ok(format!("{reserved}_")),
            Self::PrependUnderscore => Ok(format!("_{reserved}")),
            Self::AsIs => Ok(reserved.to_string()),
            Self::RaiseError => Err(err.clone()),
        }
    }
}

fn timestamp() -> String {
    let now = Utc::now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}
