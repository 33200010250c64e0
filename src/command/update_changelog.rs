//! Promote the unreleased changelog entry to a release.
use log::*;
use std::path::Path;

use crate::{
    changelog::{Changelog, CompareLinks},
    cli,
    command::common,
    config::Config,
    error::Result,
};

/// Execute the update-changelog command.
pub fn execute(args: &cli::Args, cmd: &cli::UpdateChangelogArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let path = common::changelog_path(cmd.file_path.as_deref(), &config);
    let links = common::compare_links(args, &config, &path)?;
    let date = cmd.release_date.clone().unwrap_or_else(common::today);

    update(&path, links, &cmd.release_version, &date)?;

    Ok(())
}

/// Load the changelog at `path`, release its pending entry and write it back.
///
/// The file is left untouched when the release is rejected.
pub fn update(
    path: &Path,
    links: CompareLinks,
    version: &str,
    date: &str,
) -> Result<Changelog> {
    info!("updating changelog for release {version}");

    let mut changelog = Changelog::load(path, links)?;
    changelog.release_latest(version, date)?;
    changelog.save(path)?;

    Ok(changelog)
}
