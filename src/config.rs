//! Configuration loading and parsing for `releasekeeper.toml` files.
use log::*;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    changelog::DEFAULT_TAG_PREFIX,
    error::{KeeperError, Result},
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "releasekeeper.toml";
/// Default changelog filename relative to the repository root.
pub const DEFAULT_CHANGELOG_PATH: &str = "Changelog.md";
/// Default prefix for release branches.
pub const DEFAULT_RELEASE_BRANCH_PREFIX: &str = "release-";
/// Default branch release branches are cut from.
pub const DEFAULT_SOURCE_BRANCH: &str = "stg";
/// Default git remote to push to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Root configuration structure for `releasekeeper.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)] // Use default for missing fields
pub struct Config {
    /// Changelog path relative to the repository root.
    pub changelog_path: PathBuf,
    /// Repository web URL (https://github.com/owner/repo). Used for
    /// comparison links and as the forge when no repo is given on the
    /// command line.
    pub repository: Option<String>,
    /// Prefix for tags and comparison links (e.g. "v" for "v1.0.0").
    pub tag_prefix: String,
    /// Release branches are named `<prefix><version>`.
    pub release_branch_prefix: String,
    /// Branch a new release branch is created from.
    pub source_branch: String,
    /// Branches a release pull request is opened against.
    pub base_branches: Vec<String>,
    /// Git remote that branches and tags are pushed to.
    pub remote: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            changelog_path: PathBuf::from(DEFAULT_CHANGELOG_PATH),
            repository: None,
            tag_prefix: DEFAULT_TAG_PREFIX.into(),
            release_branch_prefix: DEFAULT_RELEASE_BRANCH_PREFIX.into(),
            source_branch: DEFAULT_SOURCE_BRANCH.into(),
            base_branches: vec!["stg".into(), "prd".into()],
            remote: DEFAULT_REMOTE.into(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from
    /// `releasekeeper.toml` in the current directory when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(KeeperError::invalid_config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    info!("no configuration found: using default");
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!("loading configuration: {}", path.display());
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_branches.iter().any(|b| b.trim().is_empty()) {
            return Err(KeeperError::invalid_config(
                "base_branches must not contain empty names",
            ));
        }

        if self.remote.trim().is_empty() {
            return Err(KeeperError::invalid_config("remote must not be empty"));
        }

        Ok(())
    }

    /// Name of the branch a release is prepared on.
    pub fn release_branch(&self, version: &str) -> String {
        format!("{}{}", self.release_branch_prefix, version)
    }

    /// Tag name for a released version.
    pub fn tag_name(&self, version: &str) -> String {
        format!("{}{}", self.tag_prefix, version)
    }
}
