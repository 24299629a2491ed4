//! Structured version record and numeric normalization helpers.

use serde::Serialize;
use thiserror::Error;

/// Display suffix used for builds from a checkout with local changes.
pub const MODIFIED_SUFFIX: &str = " (Modified)";

/// Errors raised while normalizing version components.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// A digit-only component does not fit in the component integer type.
    #[error("{component} version component out of range: {value}")]
    Overflow {
        /// Which component overflowed (major, minor, patch or revision).
        component: &'static str,
        /// The raw digits that were rejected.
        value: String,
    },
    /// A component contained something other than decimal digits.
    #[error("{component} version component is not a decimal number: {value:?}")]
    NotNumeric {
        /// Which component was rejected.
        component: &'static str,
        /// The raw text that was rejected.
        value: String,
    },
}

/// Version harvested from a checkout.
///
/// Components are kept as decimal strings because that is how they are
/// handed to the surrounding build. Every component is rendered without
/// leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredVersion {
    /// Major component of the nearest `v<major>.<minor>.<patch>` tag.
    pub major: String,
    /// Minor component of the nearest tag.
    pub minor: String,
    /// Patch component of the nearest tag.
    pub patch: String,
    /// Number of commits since the nearest tag.
    pub revision: String,
    /// Short hash of the inspected commit, empty when it could not be read.
    pub commit_id: String,
    /// Whether the checkout has uncommitted changes.
    pub modified: bool,
}

impl StructuredVersion {
    /// Version of a checkout that has no matching tag yet.
    pub fn untagged(commit_id: impl Into<String>, modified: bool) -> Self {
        Self {
            major: "0".to_string(),
            minor: "0".to_string(),
            patch: "0".to_string(),
            revision: "0".to_string(),
            commit_id: commit_id.into(),
            modified,
        }
    }

    /// Version reported when the descriptor could not be understood.
    ///
    /// A non-zero revision with an empty commit id marks "something changed
    /// but we could not tell what".
    pub fn unrecognized() -> Self {
        Self {
            major: "0".to_string(),
            minor: "0".to_string(),
            patch: "0".to_string(),
            revision: "1".to_string(),
            commit_id: String::new(),
            modified: true,
        }
    }

    /// `major.minor.patch.revision`.
    pub fn version_string(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.revision
        )
    }

    /// `" (Modified)"` for a dirty checkout, empty otherwise.
    pub fn modified_string(&self) -> &'static str {
        if self.modified { MODIFIED_SUFFIX } else { "" }
    }
}

impl std::fmt::Display for StructuredVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.version_string(), self.modified_string())
    }
}

/// Parse a digit string and render it back without leading zeros.
///
/// Components are signed 32-bit values, so anything above 2147483647 is
/// [`VersionError::Overflow`]. `component` names the field in the error.
pub fn normalize_component(component: &'static str, digits: &str) -> Result<String, VersionError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::NotNumeric {
            component,
            value: digits.to_string(),
        });
    }

    digits
        .parse::<i32>()
        .map(|n| n.to_string())
        .map_err(|_| VersionError::Overflow {
            component,
            value: digits.to_string(),
        })
}

/// Normalize the three components of a `v<major>.<minor>.<patch>` tag.
pub fn normalize_triple(
    major: &str,
    minor: &str,
    patch: &str,
) -> Result<(String, String, String), VersionError> {
    Ok((
        normalize_component("major", major)?,
        normalize_component("minor", minor)?,
        normalize_component("patch", patch)?,
    ))
}
