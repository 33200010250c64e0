//! Report the latest released version recorded in the changelog.
use std::path::Path;

use crate::{
    changelog::{Changelog, CompareLinks},
    cli,
    command::common,
    config::Config,
    error::Result,
};

/// Execute the latest-version command. Prints nothing when the changelog
/// has no released version yet.
pub fn execute(args: &cli::Args, cmd: &cli::LatestVersionArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let path = common::changelog_path(cmd.file_path.as_deref(), &config);

    if let Some(version) = latest(&path)? {
        println!("{version}");
    }

    Ok(())
}

/// Latest released version in the changelog at `path`.
pub fn latest(path: &Path) -> Result<Option<semver::Version>> {
    // links are only needed when rendering
    let changelog = Changelog::load(path, CompareLinks::default())?;
    Ok(changelog.latest_released_version().cloned())
}
