//! Classify a `git describe` descriptor without touching a repository.
//!
//! Useful when the descriptor was captured elsewhere, e.g. by a CI step.
//!
//! # Examples
//!
//! ```bash
//! cargo version-harvest describe v1.2.3-4-g1a2b3c4-modified
//! # 1.2.3.4 (Modified)
//!
//! cargo version-harvest describe "$(git describe --always --long --dirty=-modified --match 'v[0-9]*')" --format json
//! ```

use anyhow::Result;
use cargo_plugin_utils::logger::Logger;
use clap::Parser;

use super::common::{
    OutputArgs,
    emit,
};
use crate::describe::classify_describe;

/// Arguments for the `describe` command.
#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// Descriptor as printed by `git describe`.
    ///
    /// One trailing line terminator is ignored.
    pub descriptor: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Classify a descriptor and print the version.
///
/// # Errors
///
/// Returns an error only for an invalid format or an unwritable output
/// file; unrecognized descriptors yield `0.0.0.1 (Modified)`.
pub fn describe(args: DescribeArgs) -> Result<()> {
    let mut logger = Logger::new();
    let descriptor = args.descriptor.trim_end_matches(['\r', '\n']);

    logger.status("Classifying", descriptor);
    let version = classify_describe(descriptor);
    logger.finish();

    emit(&version, "describe", &args.output)
}
