//! Harvester configuration from `[package.metadata.version-harvest]`.
//!
//! ```toml
//! [package.metadata.version-harvest]
//! git_path = "/usr/local/bin/git"
//! hg_path = "C:/Program Files/Mercurial/hg.exe"
//! timeout_secs = 20
//! ```
//!
//! Command-line flags and environment variables take precedence over these
//! keys; built-in defaults apply last.

use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use anyhow::{
    Context,
    Result,
};
use serde::Deserialize;

use crate::runner::DEFAULT_TIMEOUT;

/// Metadata table key inside `[package.metadata]`.
pub const METADATA_KEY: &str = "version-harvest";

/// Keys read from the manifest. All optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct HarvestConfig {
    /// Explicit git executable.
    #[serde(default)]
    pub git_path: Option<PathBuf>,

    /// Explicit hg executable.
    #[serde(default)]
    pub hg_path: Option<PathBuf>,

    /// Per-query timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl HarvestConfig {
    /// Parse the metadata table out of manifest text.
    ///
    /// Returns defaults when the table is absent.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(content).context("Failed to parse manifest")?;
        let Some(table) = ["package", "workspace"]
            .into_iter()
            .find_map(|section| value.get(section)?.get("metadata")?.get(METADATA_KEY))
        else {
            return Ok(Self::default());
        };

        table
            .clone()
            .try_into::<Self>()
            .with_context(|| format!("Invalid [package.metadata.{}] table", METADATA_KEY))
    }

    /// Load from a manifest file.
    ///
    /// A missing manifest yields defaults, since the harvester also runs in
    /// checkouts that are not cargo packages.
    pub fn from_manifest(manifest: &Path) -> Result<Self> {
        if !manifest.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(manifest)
            .with_context(|| format!("Failed to read {}", manifest.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In {}", manifest.display()))
    }

    /// Flag value, else the configured value. A blank flag counts as unset.
    pub fn git_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        non_blank(flag).or_else(|| self.git_path.clone())
    }

    /// Flag value, else the configured value. A blank flag counts as unset.
    pub fn hg_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        non_blank(flag).or_else(|| self.hg_path.clone())
    }

    /// Flag value, else the configured value, else [`DEFAULT_TIMEOUT`].
    pub fn timeout(&self, flag_secs: Option<u64>) -> Duration {
        flag_secs
            .or(self.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

fn non_blank(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.to_string_lossy().trim().is_empty())
}
