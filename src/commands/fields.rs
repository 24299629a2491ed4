//! Combine Mercurial-style version fields without touching a repository.
//!
//! # Examples
//!
//! ```bash
//! cargo version-harvest fields --latest-tag v2.1.0 --distance 8 --commit-id 1a2b3c4 --dirty
//! # 2.1.0.8 (Modified)
//! ```

use anyhow::{
    Context,
    Result,
};
use cargo_plugin_utils::logger::Logger;
use clap::Parser;

use super::common::{
    OutputArgs,
    emit,
};
use crate::fields::{
    FieldSet,
    classify_fields,
};

/// Arguments for the `fields` command.
#[derive(Parser, Debug)]
pub struct FieldsArgs {
    /// Latest tag, e.g. `v2.1.0`. Empty when the history has no tag.
    #[arg(long, default_value = "")]
    pub latest_tag: String,

    /// Number of commits since the latest tag.
    #[arg(long, default_value = "")]
    pub distance: String,

    /// Short hash of the inspected commit.
    #[arg(long, default_value = "")]
    pub commit_id: String,

    /// The checkout has uncommitted changes.
    #[arg(long)]
    pub dirty: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Combine the fields and print the version.
///
/// # Errors
///
/// Returns an error if a tag component or the distance overflows, or the
/// output cannot be written.
pub fn fields(args: FieldsArgs) -> Result<()> {
    let field_set = FieldSet {
        latest_tag: args.latest_tag,
        latest_tag_distance: args.distance,
        commit_id: args.commit_id,
        dirty: args.dirty,
    };
    let mut logger = Logger::new();
    logger.status("Classifying", &format!("tag {:?}", field_set.latest_tag));
    let version = match classify_fields(&field_set) {
        Ok(version) => version,
        Err(err) => {
            logger.warning("Failed", &err.to_string());
            return Err(err).with_context(|| {
                format!("Cannot build a version from tag {:?}", field_set.latest_tag)
            });
        }
    };
    logger.finish();

    emit(&version, "fields", &args.output)
}
