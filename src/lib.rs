#![doc = include_str!("../README.md")]

/// Command implementations and argument types.
pub mod commands;
/// `[package.metadata.version-harvest]` settings.
pub mod config;
/// Classification of `git describe` descriptors.
pub mod describe;
/// Locating the git and hg executables.
pub mod discovery;
/// Harvest errors.
pub mod error;
/// Classification of Mercurial tag fields.
pub mod fields;
/// Version harvesting on top of the command runners.
pub mod harvest;
/// Running external version control commands with a timeout.
pub mod runner;
/// Structured version helpers.
pub mod version;
