//! Output handling shared by the harvesting commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use clap::Args;
use serde::Serialize;

use crate::version::StructuredVersion;

/// Output options accepted by every harvesting command.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format for the harvested version.
    ///
    /// - `version`: Print `major.minor.patch.revision` and the modified suffix
    /// - `json`: Print JSON with every field and the backend it came from
    /// - `env`: Print shell-sourceable `MAJOR_VERSION=...` lines
    /// - `github-actions`: Append `major=...` lines to GITHUB_OUTPUT
    #[arg(long, default_value = "version")]
    pub format: String,

    /// Path to GitHub Actions output file.
    ///
    /// Only used when `--format github-actions` is specified.
    /// Defaults to the `GITHUB_OUTPUT` environment variable or stdout.
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,
}

impl Default for OutputArgs {
    fn default() -> Self {
        Self {
            format: "version".to_string(),
            github_output: None,
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    major: &'a str,
    minor: &'a str,
    patch: &'a str,
    revision: &'a str,
    version: String,
    commit_id: &'a str,
    modified: bool,
    modified_string: &'a str,
    source: &'a str,
}

/// Render `version` in the requested format.
///
/// `source` names the backend (`git`, `hg`, `describe` or `fields`) and
/// only appears in JSON output.
pub fn render(version: &StructuredVersion, source: &str, format: &str) -> Result<String> {
    let rendered = match format {
        "version" => version.to_string(),
        "json" => serde_json::to_string(&JsonOutput {
            major: &version.major,
            minor: &version.minor,
            patch: &version.patch,
            revision: &version.revision,
            version: version.version_string(),
            commit_id: &version.commit_id,
            modified: version.modified,
            modified_string: version.modified_string(),
            source,
        })
        .context("Failed to serialize version")?,
        "env" => [
            format!("MAJOR_VERSION={}", version.major),
            format!("MINOR_VERSION={}", version.minor),
            format!("PATCH_VERSION={}", version.patch),
            format!("REVISION_VERSION={}", version.revision),
            format!("COMMIT_ID={}", version.commit_id),
            format!("MODIFIED={}", version.modified),
            format!("MODIFIED_STRING=\"{}\"", version.modified_string()),
        ]
        .join("\n"),
        "github-actions" => [
            format!("major={}", version.major),
            format!("minor={}", version.minor),
            format!("patch={}", version.patch),
            format!("revision={}", version.revision),
            format!("version={}", version.version_string()),
            format!("commit_id={}", version.commit_id),
            format!("modified={}", version.modified),
            format!("modified_string={}", version.modified_string()),
        ]
        .join("\n"),
        _ => anyhow::bail!("Invalid format: {}", format),
    };
    Ok(rendered)
}

/// Render and write `version` to stdout or the GitHub Actions output file.
pub fn emit(version: &StructuredVersion, source: &str, output: &OutputArgs) -> Result<()> {
    let rendered = render(version, source, &output.format)?;

    match (output.format.as_str(), &output.github_output) {
        ("github-actions", Some(path)) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            writeln!(file, "{}", rendered)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        _ => println!("{}", rendered),
    }

    Ok(())
}

/// Run an async harvest on a fresh tokio runtime.
pub fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    Ok(rt.block_on(future))
}
