//! Common functionality shared between commands
use chrono::Local;
use log::*;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    changelog::{CompareLinks, detect_base_url, record::DATE_FORMAT},
    cli,
    config::Config,
    error::{KeeperError, Result},
    repo::Repository,
};

/// Today's date in the changelog date format.
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Changelog path from the command line, or the configured one.
pub fn changelog_path(file_path: Option<&Path>, config: &Config) -> PathBuf {
    file_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.changelog_path.clone())
}

/// Comparison link builder for the repository being released.
pub fn compare_links(
    args: &cli::Args,
    config: &Config,
    changelog: &Path,
) -> Result<CompareLinks> {
    let dir = env::current_dir()?;
    let base_url =
        link_base_url(args.repository_url(config), &dir, config, changelog)?;

    Ok(CompareLinks::new(base_url, config.tag_prefix.clone()))
}

/// Resolve the base URL of the comparison links.
///
/// An explicit repository URL wins and must parse. Otherwise the configured
/// remote of the repository containing `dir` is used, then the base of the
/// links already in the changelog. When none is available the links are
/// written without a base.
fn link_base_url(
    explicit: Option<String>,
    dir: &Path,
    config: &Config,
    changelog: &Path,
) -> Result<String> {
    if let Some(url) = explicit {
        return cli::repo_web_url(&url);
    }

    match remote_web_url(dir, &config.remote) {
        Ok(url) => {
            debug!("using comparison link base from {}: {url}", config.remote);
            return Ok(url);
        }
        Err(err) => debug!("remote {} has no usable url: {err}", config.remote),
    }

    if let Ok(content) = fs::read_to_string(changelog)
        && let Some(url) = detect_base_url(&content)
    {
        debug!("using comparison link base from changelog: {url}");
        return Ok(url);
    }

    warn!("unable to determine repository url: comparison links have no base");
    Ok(String::new())
}

fn remote_web_url(dir: &Path, remote: &str) -> Result<String> {
    let repo = Repository::open(dir)?;
    let url = repo.remote_url(remote)?.ok_or_else(|| {
        KeeperError::InvalidRemote(format!("remote {remote} has no url"))
    })?;
    cli::repo_web_url(&url)
}
