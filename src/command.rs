//! Command execution for releasekeeper.
//!
//! - **update_changelog**: promote the unreleased changelog entry to a release
//! - **latest_version**: print the newest released version
//! - **release**: update the changelog, commit, tag and push, then create a
//!   draft release and a pull request into each base branch
//!
//! Changelog preconditions are checked before anything is written, so a
//! rejected release leaves both the file and the repository untouched.

/// Helpers shared by the commands.
pub mod common;

/// Report the latest released version.
pub mod latest_version;

/// The full release workflow.
pub mod release;

/// Changelog update without any git or forge interaction.
pub mod update_changelog;

use crate::{cli, error::Result};

/// Dispatch a parsed command line to its command.
pub async fn execute(args: &cli::Args) -> Result<()> {
    match &args.command {
        cli::Command::UpdateChangelog(cmd) => {
            update_changelog::execute(args, cmd)
        }
        cli::Command::LatestVersion(cmd) => latest_version::execute(args, cmd),
        cli::Command::Release(cmd) => release::execute(args, cmd).await,
    }
}
