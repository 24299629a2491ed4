//! Errors surfaced by the harvest pipeline.

use thiserror::Error;

use crate::runner::RunnerError;
use crate::version::VersionError;

/// Failure of one version-resolution attempt.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// No executable was configured and none could be discovered.
    #[error("could not find {tool}; set {setting} explicitly or make sure {tool} is on the PATH")]
    ExecutableNotFound {
        /// Executable name, e.g. `git`.
        tool: &'static str,
        /// Flag or config key that sets it, e.g. `--git-path`.
        setting: &'static str,
    },
    /// The VCS query failed.
    #[error(transparent)]
    Runner(#[from] RunnerError),
    /// The VCS output held a number that does not fit a version component.
    #[error(transparent)]
    Version(#[from] VersionError),
}
