//! Query a checkout and classify the result.
//!
//! These functions sit between the runners and the command surface: they
//! never print, and a runner failure comes back as [`HarvestError`] without
//! a partial version.

use std::path::Path;

use crate::describe::classify_describe;
use crate::error::HarvestError;
use crate::fields::{
    FieldSet,
    classify_fields,
};
use crate::runner::{
    DescribeRunner,
    LogRunner,
};
use crate::version::StructuredVersion;

/// Outcome of the git backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHarvest {
    /// Raw descriptor line as printed by `git describe`.
    pub descriptor: String,
    /// Classified version.
    pub version: StructuredVersion,
}

/// Outcome of the Mercurial backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HgHarvest {
    /// Fields as reported by `hg`.
    pub fields: FieldSet,
    /// Classified version.
    pub version: StructuredVersion,
}

/// Run `git describe` and classify its output.
///
/// # Errors
///
/// Returns [`HarvestError::Runner`] when the query fails. An unrecognized
/// descriptor is not an error.
pub async fn harvest_git<R: DescribeRunner>(
    runner: &R,
    git_path: &Path,
) -> Result<GitHarvest, HarvestError> {
    let descriptor = runner.run_describe(git_path).await?;
    let version = classify_describe(&descriptor);
    Ok(GitHarvest {
        descriptor,
        version,
    })
}

/// Run the Mercurial queries and combine the fields.
///
/// # Errors
///
/// Returns [`HarvestError::Runner`] when a query fails and
/// [`HarvestError::Version`] when a number overflows.
pub async fn harvest_hg<R: LogRunner>(runner: &R, hg_path: &Path) -> Result<HgHarvest, HarvestError> {
    let fields = runner.run_log(hg_path).await?;
    let version = classify_fields(&fields)?;
    Ok(HgHarvest { fields, version })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };
    use std::time::Duration;

    use super::*;
    use crate::runner::RunnerError;
    use crate::version::VersionError;

    struct FakeDescribe {
        output: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeDescribe {
        fn new(output: Option<&'static str>) -> Self {
            Self {
                output,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DescribeRunner for FakeDescribe {
        async fn run_describe(&self, git_path: &Path) -> Result<String, RunnerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.output
                .map(str::to_string)
                .ok_or_else(|| RunnerError::Timeout {
                    program: git_path.to_path_buf(),
                    timeout: Duration::from_secs(10),
                })
        }
    }

    struct FakeLog {
        fields: Option<FieldSet>,
    }

    impl LogRunner for FakeLog {
        async fn run_log(&self, hg_path: &Path) -> Result<FieldSet, RunnerError> {
            self.fields.clone().ok_or_else(|| RunnerError::NotFound {
                program: hg_path.to_path_buf(),
            })
        }
    }

    fn git_path() -> PathBuf {
        PathBuf::from("/usr/bin/git")
    }

    #[tokio::test]
    async fn test_harvest_git_tagged() {
        let runner = FakeDescribe::new(Some("v1.2.3-4-g1a2b3c4"));
        let harvest = harvest_git(&runner, &git_path()).await.unwrap();
        assert_eq!(harvest.descriptor, "v1.2.3-4-g1a2b3c4");
        assert_eq!(harvest.version.version_string(), "1.2.3.4");
        assert_eq!(harvest.version.commit_id, "1a2b3c4");
        assert!(!harvest.version.modified);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_harvest_git_unrecognized_is_not_an_error() {
        let runner = FakeDescribe::new(Some("fatal: something odd"));
        let harvest = harvest_git(&runner, &git_path()).await.unwrap();
        assert_eq!(harvest.version, StructuredVersion::unrecognized());
    }

    #[tokio::test]
    async fn test_harvest_git_runner_failure() {
        let runner = FakeDescribe::new(None);
        let err = harvest_git(&runner, &git_path()).await.unwrap_err();
        assert!(matches!(
            err,
            HarvestError::Runner(RunnerError::Timeout { .. })
        ));
        assert!(err.to_string().contains("did not return within 10 seconds"));
    }

    #[tokio::test]
    async fn test_harvest_git_is_repeatable() {
        let runner = FakeDescribe::new(Some("1a2b3c4-modified"));
        let first = harvest_git(&runner, &git_path()).await.unwrap();
        let second = harvest_git(&runner, &git_path()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_harvest_hg_tagged() {
        let fields = FieldSet {
            latest_tag: "v2.1.0".to_string(),
            latest_tag_distance: "8".to_string(),
            commit_id: "1a2b3c4".to_string(),
            dirty: true,
        };
        let runner = FakeLog {
            fields: Some(fields.clone()),
        };
        let harvest = harvest_hg(&runner, Path::new("hg")).await.unwrap();
        assert_eq!(harvest.fields, fields);
        assert_eq!(harvest.version.version_string(), "2.1.0.8");
        assert!(harvest.version.modified);
    }

    #[tokio::test]
    async fn test_harvest_hg_overflow() {
        let runner = FakeLog {
            fields: Some(FieldSet {
                latest_tag: "v1.0.0".to_string(),
                latest_tag_distance: "123456789012".to_string(),
                commit_id: "1a2b3c4".to_string(),
                dirty: false,
            }),
        };
        let err = harvest_hg(&runner, Path::new("hg")).await.unwrap_err();
        assert!(matches!(
            err,
            HarvestError::Version(VersionError::Overflow { .. })
        ));
    }

    #[tokio::test]
    async fn test_harvest_hg_runner_failure() {
        let runner = FakeLog { fields: None };
        let err = harvest_hg(&runner, Path::new("hg")).await.unwrap_err();
        assert!(matches!(
            err,
            HarvestError::Runner(RunnerError::NotFound { .. })
        ));
    }
}
