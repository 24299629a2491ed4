//! Harvest the version of a git checkout.
//!
//! Runs `git describe --always --long --dirty=-modified --match=v[0-9]*` in
//! the repository and classifies the descriptor it prints.
//!
//! # Examples
//!
//! ```bash
//! # Print the version (e.g., "1.2.3.4 (Modified)")
//! cargo version-harvest git
//!
//! # JSON with every field
//! cargo version-harvest git --format json
//!
//! # Use a specific git binary and a longer timeout
//! cargo version-harvest git --git-path /opt/git/bin/git --timeout-secs 20
//!
//! # Publish outputs in GitHub Actions
//! cargo version-harvest git --format github-actions
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
use crate::describe::shape_of;
use crate::discovery::{
    Tool,
    resolve_executable,
};
use crate::harvest::harvest_git;
use crate::runner::{
    CommandRunner,
    GitDescribeRunner,
};

/// Arguments for the `git` command.
#[derive(Parser, Debug)]
pub struct GitArgs {
    /// Path to the git executable.
    ///
    /// Defaults to the `GIT_PATH` environment variable, then `git_path` in
    /// `[package.metadata.version-harvest]`, then a search of `PATH` and
    /// common installation directories.
    #[arg(long, env = "GIT_PATH")]
    pub git_path: Option<PathBuf>,

    /// Path inside the git repository to describe.
    #[arg(long, default_value = ".")]
    pub repo_path: PathBuf,

    /// Path to the Cargo.toml holding `[package.metadata.version-harvest]`.
    ///
    /// A missing manifest is not an error.
    #[arg(long, default_value = "./Cargo.toml")]
    pub manifest: PathBuf,

    /// Seconds to wait for `git describe` before giving up.
    ///
    /// Defaults to `timeout_secs` from the manifest, then 10.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log every location probed while searching for git.
    #[arg(long)]
    pub verbose: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Harvest the version of a git checkout and print it.
///
/// # Errors
///
/// Returns an error if:
/// - The manifest exists but cannot be parsed
/// - No git executable is configured or found
/// - `repo_path` is not inside a git repository
/// - `git describe` fails, exits non-zero, or times out
/// - The output cannot be written
///
/// An unrecognized descriptor is not an error; it is reported as
/// `0.0.0.1 (Modified)` with an empty commit id.
///
/// # Example Output
///
/// With `--format version`:
/// ```text
/// 1.2.3.4 (Modified)
/// ```
///
/// With `--format json`:
/// ```json
/// {"major":"1","minor":"2","patch":"3","revision":"4","version":"1.2.3.4","commit_id":"1a2b3c4","modified":true,"modified_string":" (Modified)","source":"git"}
/// ```
pub fn git(args: GitArgs) -> Result<()> {
    let mut logger = Logger::new();
    let config = HarvestConfig::from_manifest(&args.manifest)?;

    logger.status("Resolving", "git executable");
    let verbose = args.verbose;
    let git_path = resolve_executable(
        Tool::Git,
        config.git_path(args.git_path).as_deref(),
        |probe| {
            if verbose {
                logger.print_message(&format!(
                    "Searching for git, probing location: '{}'",
                    probe.display()
                ));
            }
        },
    )
    .context("A git executable is required to harvest a git version")?;

    let repo = gix::discover(&args.repo_path).with_context(|| {
        format!(
            "Failed to discover git repository at {}",
            args.repo_path.display()
        )
    })?;
    logger.finish();

    let runner = CommandRunner::new(&args.repo_path).with_timeout(config.timeout(args.timeout_secs));

    logger.print_message(&format!("Git executable path: {}", git_path.display()));
    logger.print_message(&format!(
        "Git working path: {}",
        runner.working_dir().display()
    ));
    logger.print_message(&format!("Git repository: {}", repo.path().display()));
    logger.print_message(&format!("Git query timeout: {}s", runner.timeout().as_secs()));

    let describe = GitDescribeRunner::new(runner);

    logger.status("Running", "git describe");
    let harvest = match block_on(harvest_git(&describe, &git_path))? {
        Ok(harvest) => harvest,
        Err(err) => {
            logger.warning("Failed", &err.to_string());
            return Err(err).context("Failed to harvest git version");
        }
    };
    logger.finish();

    logger.print_message(&format!("Git describe result: {}", harvest.descriptor));
    logger.print_message(&format!(
        "Descriptor shape: {}",
        shape_of(&harvest.descriptor).unwrap_or("unrecognized")
    ));
    emit(&harvest.version, "git", &args.output)
}
