//! Cargo subcommand that harvests a four-part version from version control.
//!
//! This tool turns the state of a checkout into
//! `major.minor.patch.revision` plus a commit id and a modified flag:
//! - `git`: classify the output of `git describe`
//! - `hg`: combine Mercurial's latest tag, distance and node
//! - `describe`: classify a descriptor captured elsewhere
//! - `fields`: combine Mercurial-style fields captured elsewhere
//!
//! Replaces hand-written `git describe` parsing in build scripts and CI
//! workflows.

use std::fs;

use anyhow::Result;
use cargo_version_harvest::commands;
use cargo_version_harvest::commands::{
    DescribeArgs,
    FieldsArgs,
    GitArgs,
    HgArgs,
};
use clap::{
    ArgAction,
    CommandFactory,
    Parser,
    Subcommand,
};

#[derive(Parser, Debug)]
#[command(
    bin_name = "cargo",
    disable_version_flag = true,
    arg_required_else_help = false
)]
struct CargoArgs {
    #[command(subcommand)]
    subcmd: Option<TopCommand>,
}

#[derive(Subcommand, Debug)]
enum TopCommand {
    /// Harvest a four-part version from git or Mercurial
    #[command(name = "version-harvest")]
    VersionHarvest(VersionHarvestCli),
}

#[derive(Parser, Debug)]
#[command(
    disable_version_flag = true,
    subcommand_required = false,
    arg_required_else_help = false
)]
struct VersionHarvestCli {
    /// Print the version of this tool and the commit it was built from.
    #[arg(long = "version", short = 'V', action = ArgAction::SetTrue)]
    version_flag: bool,

    #[command(subcommand)]
    command: Option<VersionHarvestCommand>,
}

#[derive(Parser, Debug)]
enum VersionHarvestCommand {
    /// Harvest the version of a git checkout via `git describe`
    #[command(name = "git")]
    Git(GitArgs),
    /// Harvest the version of a Mercurial checkout via `hg log`
    #[command(name = "hg")]
    Hg(HgArgs),
    /// Classify a `git describe` descriptor
    #[command(name = "describe")]
    Describe(DescribeArgs),
    /// Combine a latest tag, distance and commit id
    #[command(name = "fields")]
    Fields(FieldsArgs),
}

/// Version line printed by `--version`.
fn tool_version() -> String {
    format!(
        "cargo-version-harvest {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("VERSION_HARVEST_COMMIT")
    )
}

/// Check if any .env* files exist in the current directory.
fn has_env_files() -> bool {
    let current_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(_) => return false,
    };

    let patterns = [".env", ".env.local", ".env.prod", ".env.dev", ".env.test"];

    for pattern in &patterns {
        let path = current_dir.join(pattern);
        if fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
            return true;
        }
    }

    // Also check for .env.{USER} pattern
    if let Ok(user) = std::env::var("USER") {
        let path = current_dir.join(format!(".env.{}", user));
        if fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
            return true;
        }
    }

    false
}

fn main() -> Result<()> {
    // GIT_PATH, HG_PATH and GITHUB_OUTPUT may live in .env* files.
    // Only attempt to load if .env* files exist to avoid unnecessary warnings
    if has_env_files()
        && let Err(e) = dotenvage::EnvLoader::new().and_then(|loader| loader.load())
    {
        eprintln!("Warning: Failed to load/decrypt env files: {}", e);
        eprintln!("Continuing with existing environment variables...");
    }

    let args = CargoArgs::parse();

    if let Some(TopCommand::VersionHarvest(cli)) = args.subcmd {
        if cli.version_flag {
            println!("{}", tool_version());
            return Ok(());
        }

        if let Some(command) = cli.command {
            return match command {
                VersionHarvestCommand::Git(args) => commands::git(args),
                VersionHarvestCommand::Hg(args) => commands::hg(args),
                VersionHarvestCommand::Describe(args) => commands::describe(args),
                VersionHarvestCommand::Fields(args) => commands::fields(args),
            };
        }

        // No inner command: show help
        VersionHarvestCli::command().print_help()?;
        println!();
        return Ok(());
    }

    // No subcommand: show help
    CargoArgs::command().print_help()?;
    println!();
    Ok(())
}
