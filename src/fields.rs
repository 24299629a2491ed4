//! Classifier for Mercurial's discrete version fields.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::version::{
    StructuredVersion,
    VersionError,
    normalize_component,
    normalize_triple,
};

static TAG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^v(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)$").ok()
});

/// The four values Mercurial reports for the working directory parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSet {
    /// `{latesttag}`; empty or `null` when the history has no tag.
    pub latest_tag: String,
    /// `{latesttagdistance}`.
    pub latest_tag_distance: String,
    /// `{node|short}`.
    pub commit_id: String,
    /// Whether `hg status` reported added, modified, removed or deleted files.
    pub dirty: bool,
}

/// Distance rendered as a revision component.
///
/// Blank or non-numeric distances count as zero; a numeric distance that
/// does not fit is an error.
fn revision_from_distance(distance: &str) -> Result<String, VersionError> {
    match normalize_component("revision", distance.trim()) {
        Ok(revision) => Ok(revision),
        Err(VersionError::NotNumeric { .. }) => Ok("0".to_string()),
        Err(err) => Err(err),
    }
}

/// Combine a [`FieldSet`] into a [`StructuredVersion`].
///
/// Tags other than `v<major>.<minor>.<patch>` give a zero version. The
/// commit id and dirty flag are always passed through unchanged.
///
/// # Errors
///
/// Returns [`VersionError::Overflow`] when a tag component or the distance
/// does not fit in the component integer type.
pub fn classify_fields(fields: &FieldSet) -> Result<StructuredVersion, VersionError> {
    let caps = TAG_PATTERN
        .as_ref()
        .and_then(|re| re.captures(&fields.latest_tag));

    let Some(caps) = caps else {
        return Ok(StructuredVersion::untagged(
            fields.commit_id.clone(),
            fields.dirty,
        ));
    };

    let (major, minor, patch) = normalize_triple(&caps["major"], &caps["minor"], &caps["patch"])?;
    let revision = revision_from_distance(&fields.latest_tag_distance)?;

    Ok(StructuredVersion {
        major,
        minor,
        patch,
        revision,
        commit_id: fields.commit_id.clone(),
        modified: fields.dirty,
    })
}
