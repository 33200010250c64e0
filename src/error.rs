//! Custom error types for releasekeeper.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for releasekeeper operations.
#[derive(Error, Debug)]
pub enum KeeperError {
    // Changelog errors
    #[error("Changelog file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid version '{input}': {reason}")]
    VersionParse { input: String, reason: String },

    #[error("Invalid release date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(
        "Cannot release {requested}: version must be greater than the previous release {previous}"
    )]
    NonMonotonicVersion { requested: String, previous: String },

    #[error(
        "Unable to release the latest version as it is already released: check the changelog file for errors"
    )]
    AlreadyReleased,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // Forge/Git errors
    #[error("Invalid remote configuration: {0}")]
    InvalidRemote(String),

    #[error("Git URL parse error: {0}")]
    GitUrl(#[from] git_url_parse::GitUrlParseError),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Forge operation failed: {0}")]
    Forge(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using KeeperError
pub type Result<T> = std::result::Result<T, KeeperError>;

impl KeeperError {
    /// Create a version parse error for the given input
    pub fn version_parse(
        input: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::VersionParse {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::Forge(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<octocrab::Error> for KeeperError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => Self::Forge(format!(
                "GitHub API error ({}): {}",
                source.status_code, source.message
            )),
            _ => Self::Forge(format!("GitHub API error: {}", err)),
        }
    }
}
