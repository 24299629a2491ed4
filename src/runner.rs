//! Read-only VCS queries with a bounded wait.
//!
//! [`CommandRunner`] spawns one process, captures its output and kills it
//! when the timeout elapses. [`GitDescribeRunner`] and [`HgLogRunner`] build
//! the backend queries on top of it. The [`DescribeRunner`] and
//! [`LogRunner`] traits are the seams the harvest pipeline consumes, so tests
//! can swap in canned output.

use std::future::Future;
use std::io;
use std::path::{
    Path,
    PathBuf,
};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::fields::FieldSet;

/// Default bound on a single VCS query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Arguments passed to `git` to obtain the version descriptor.
pub const GIT_DESCRIBE_ARGS: [&str; 5] = [
    "describe",
    "--always",
    "--long",
    "--dirty=-modified",
    "--match=v[0-9]*",
];

/// Why a VCS query produced no output.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The executable does not exist.
    #[error("executable not found: {}", .program.display())]
    NotFound {
        /// Program that was requested.
        program: PathBuf,
    },
    /// The process could not be started for another reason.
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        /// Program that was requested.
        program: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// The process did not finish within the bound and was killed.
    #[error("{} did not return within {} seconds", .program.display(), .timeout.as_secs_f32())]
    Timeout {
        /// Program that was requested.
        program: PathBuf,
        /// The bound that elapsed.
        timeout: Duration,
    },
    /// The process exited unsuccessfully.
    #[error(
        "{} {args} failed with exit code {}: {stderr}",
        .program.display(),
        .code.map_or("unknown".to_string(), |c| c.to_string())
    )]
    NonZeroExit {
        /// Program that was requested.
        program: PathBuf,
        /// Arguments, space separated.
        args: String,
        /// Exit code, absent when killed by a signal.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// Waiting on the process failed.
    #[error("failed to collect output of {}: {source}", .program.display())]
    Io {
        /// Program that was requested.
        program: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
}

/// Runs a program in a checkout and returns its standard output.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    working_dir: PathBuf,
    timeout: Duration,
}

impl CommandRunner {
    /// Runner for `working_dir` with [`DEFAULT_TIMEOUT`].
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-query timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory the queries run in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Per-query timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args` and return its standard output.
    ///
    /// Standard output is decoded lossily. The child is killed if the
    /// timeout elapses first.
    pub async fn run(&self, program: &Path, args: &[&str]) -> Result<String, RunnerError> {
        let child = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => RunnerError::NotFound {
                    program: program.to_path_buf(),
                },
                _ => RunnerError::Spawn {
                    program: program.to_path_buf(),
                    source,
                },
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RunnerError::Timeout {
                program: program.to_path_buf(),
                timeout: self.timeout,
            })?
            .map_err(|source| RunnerError::Io {
                program: program.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(RunnerError::NonZeroExit {
                program: program.to_path_buf(),
                args: args.join(" "),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Source of a single `git describe` descriptor line.
pub trait DescribeRunner {
    /// Run the describe query with the given git executable.
    fn run_describe(
        &self,
        git_path: &Path,
    ) -> impl Future<Output = Result<String, RunnerError>> + Send;
}

/// Source of Mercurial's four version fields.
pub trait LogRunner {
    /// Run the log and status queries with the given hg executable.
    fn run_log(&self, hg_path: &Path) -> impl Future<Output = Result<FieldSet, RunnerError>> + Send;
}

/// Strip the trailing line terminator from a one-line query result.
fn first_line(stdout: &str) -> String {
    stdout.trim_end_matches(['\r', '\n']).to_string()
}

/// `git describe` through a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct GitDescribeRunner {
    runner: CommandRunner,
}

impl GitDescribeRunner {
    /// Wrap a runner.
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }
}

impl DescribeRunner for GitDescribeRunner {
    async fn run_describe(&self, git_path: &Path) -> Result<String, RunnerError> {
        let stdout = self.runner.run(git_path, &GIT_DESCRIBE_ARGS).await?;
        Ok(first_line(&stdout))
    }
}

/// `hg log` and `hg status` through a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct HgLogRunner {
    runner: CommandRunner,
}

impl HgLogRunner {
    /// Wrap a runner.
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    async fn template(&self, hg_path: &Path, template: &str) -> Result<String, RunnerError> {
        let stdout = self
            .runner
            .run(hg_path, &["log", "-r", ".", "--template", template])
            .await?;
        Ok(first_line(&stdout))
    }
}

impl LogRunner for HgLogRunner {
    async fn run_log(&self, hg_path: &Path) -> Result<FieldSet, RunnerError> {
        let latest_tag = self.template(hg_path, "{latesttag}").await?;
        let latest_tag_distance = self.template(hg_path, "{latesttagdistance}").await?;
        let commit_id = self.template(hg_path, "{node|short}").await?;
        let changed_files = self
            .runner
            .run(
                hg_path,
                &[
                    "status",
                    "--added",
                    "--modified",
                    "--removed",
                    "--deleted",
                    "--subrepos",
                ],
            )
            .await?;

        Ok(FieldSet {
            latest_tag,
            latest_tag_distance,
            commit_id,
            dirty: !changed_files.trim().is_empty(),
        })
    }
}
