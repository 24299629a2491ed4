//! Harvest the version of a Mercurial checkout.
//!
//! Reads `{latesttag}`, `{latesttagdistance}` and `{node|short}` from
//! `hg log -r .` and checks `hg status` for local changes.
//!
//! # Examples
//!
//! ```bash
//! # Print the version (e.g., "2.1.0.8")
//! cargo version-harvest hg
//!
//! # Shell-sourceable variables
//! cargo version-harvest hg --format env
//! ```

use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use cargo_plugin_utils::logger::Logger;
use clap::Parser;

use super::common::{
    OutputArgs,
    block_on,
    emit,
};
use crate::config::HarvestConfig;
use crate::discovery::{
    Tool,
    resolve_executable,
};
use crate::harvest::harvest_hg;
use crate::runner::{
    CommandRunner,
    HgLogRunner,
};

/// Arguments for the `hg` command.
#[derive(Parser, Debug)]
pub struct HgArgs {
    /// Path to the hg executable.
    ///
    /// Defaults to the `HG_PATH` environment variable, then `hg_path` in
    /// `[package.metadata.version-harvest]`, then a search of `PATH` and
    /// common installation directories.
    #[arg(long, env = "HG_PATH")]
    pub hg_path: Option<PathBuf>,

    /// Path inside the Mercurial repository.
    #[arg(long, default_value = ".")]
    pub repo_path: PathBuf,

    /// Path to the Cargo.toml holding `[package.metadata.version-harvest]`.
    #[arg(long, default_value = "./Cargo.toml")]
    pub manifest: PathBuf,

    /// Seconds to wait for each hg query before giving up.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log every location probed while searching for hg.
    #[arg(long)]
    pub verbose: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Harvest the version of a Mercurial checkout and print it.
///
/// # Errors
///
/// Returns an error if:
/// - The manifest exists but cannot be parsed
/// - No hg executable is configured or found
/// - Any hg query fails, exits non-zero, or times out
/// - The latest tag or its distance does not fit a version component
/// - The output cannot be written
pub fn hg(args: HgArgs) -> Result<()> {
    let mut logger = Logger::new();
    let config = HarvestConfig::from_manifest(&args.manifest)?;

    logger.status("Resolving", "hg executable");
    let verbose = args.verbose;
    let hg_path = resolve_executable(Tool::Hg, config.hg_path(args.hg_path).as_deref(), |probe| {
        if verbose {
            logger.print_message(&format!(
                "Searching for hg, probing location: '{}'",
                probe.display()
            ));
        }
    })
    .context("An hg executable is required to harvest a Mercurial version")?;
    logger.finish();

    let runner = CommandRunner::new(&args.repo_path).with_timeout(config.timeout(args.timeout_secs));

    logger.print_message(&format!("Hg executable path: {}", hg_path.display()));
    logger.print_message(&format!(
        "Hg working path: {}",
        runner.working_dir().display()
    ));
    logger.print_message(&format!("Hg query timeout: {}s", runner.timeout().as_secs()));

    let log = HgLogRunner::new(runner);

    logger.status("Running", "hg log");
    let harvest = match block_on(harvest_hg(&log, &hg_path))? {
        Ok(harvest) => harvest,
        Err(err) => {
            logger.warning("Failed", &err.to_string());
            return Err(err).context("Failed to harvest Mercurial version");
        }
    };
    logger.finish();

    logger.print_message(&format!(
        "Hg latest tag: {}, distance: {}, node: {}, dirty: {}",
        harvest.fields.latest_tag,
        harvest.fields.latest_tag_distance,
        harvest.fields.commit_id,
        harvest.fields.dirty
    ));
    emit(&harvest.version, "hg", &args.output)
}
