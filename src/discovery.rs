//! Locating the `git` and `hg` executables.

use std::env;
use std::ffi::OsString;
use std::path::{
    Path,
    PathBuf,
};

use crate::error::HarvestError;

/// A VCS tool the harvester knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// The git CLI.
    Git,
    /// The Mercurial CLI.
    Hg,
}

impl Tool {
    /// Executable file stem.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Git => "git",
            Tool::Hg => "hg",
        }
    }

    /// Flag that sets the executable explicitly.
    pub fn setting(self) -> &'static str {
        match self {
            Tool::Git => "--git-path",
            Tool::Hg => "--hg-path",
        }
    }

    /// Executable file name with the platform suffix.
    pub fn file_name(self) -> String {
        format!("{}{}", self.name(), env::consts::EXE_SUFFIX)
    }

    /// Installation directories probed after `PATH`.
    pub fn well_known_dirs(self) -> Vec<PathBuf> {
        if cfg!(windows) {
            let program_files = program_files_dirs();
            let subdir: &[&str] = match self {
                Tool::Git => &["Git", "bin"],
                Tool::Hg => &["Mercurial"],
            };
            program_files
                .into_iter()
                .map(|root| subdir.iter().fold(root, |dir, part| dir.join(part)))
                .collect()
        } else {
            ["/usr/local/bin", "/usr/bin", "/opt/homebrew/bin"]
                .into_iter()
                .map(PathBuf::from)
                .collect()
        }
    }
}

/// `Program Files` and its `(x86)` sibling.
fn program_files_dirs() -> Vec<PathBuf> {
    let Some(pf) = env::var_os("ProgramFiles").map(PathBuf::from) else {
        return vec![
            PathBuf::from(r"C:\Program Files"),
            PathBuf::from(r"C:\Program Files (x86)"),
        ];
    };

    let pf_str = pf.to_string_lossy().into_owned();
    let sibling = if pf_str.contains(" (x86)") {
        PathBuf::from(pf_str.replace(" (x86)", ""))
    } else {
        PathBuf::from(format!("{pf_str} (x86)"))
    };
    vec![pf, sibling]
}

/// Every location probed for `tool`, in order, given a `PATH` value.
pub fn candidate_paths(tool: Tool, path_var: Option<OsString>) -> Vec<PathBuf> {
    let file_name = tool.file_name();
    path_var
        .map(|paths| env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .chain(tool.well_known_dirs())
        .map(|dir| dir.join(&file_name))
        .collect()
}

/// Search `PATH` and the well-known directories for `tool`.
///
/// `probe` is called with each location before it is checked.
pub fn find_executable(tool: Tool, probe: impl FnMut(&Path)) -> Option<PathBuf> {
    find_executable_in(tool, env::var_os("PATH"), probe)
}

fn find_executable_in(
    tool: Tool,
    path_var: Option<OsString>,
    mut probe: impl FnMut(&Path),
) -> Option<PathBuf> {
    candidate_paths(tool, path_var)
        .into_iter()
        .find(|candidate| {
            probe(candidate.as_path());
            candidate.is_file()
        })
}

/// Use the explicit path when set, otherwise discover the tool.
///
/// A blank explicit path counts as unset.
///
/// # Errors
///
/// Returns [`HarvestError::ExecutableNotFound`] when nothing is configured
/// and discovery finds nothing.
pub fn resolve_executable(
    tool: Tool,
    explicit: Option<&Path>,
    probe: impl FnMut(&Path),
) -> Result<PathBuf, HarvestError> {
    resolve_executable_in(tool, explicit, env::var_os("PATH"), probe)
}

fn resolve_executable_in(
    tool: Tool,
    explicit: Option<&Path>,
    path_var: Option<OsString>,
    probe: impl FnMut(&Path),
) -> Result<PathBuf, HarvestError> {
    if let Some(path) = explicit.filter(|p| !p.to_string_lossy().trim().is_empty()) {
        return Ok(path.to_path_buf());
    }

    find_executable_in(tool, path_var, probe).ok_or(HarvestError::ExecutableNotFound {
        tool: tool.name(),
        setting: tool.setting(),
    })
}
