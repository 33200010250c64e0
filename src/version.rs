//! Version capability used by the changelog model.
//!
//! The changelog never interprets version strings itself; it goes through
//! [`ReleaseVersion`]. The production implementation is `semver::Version`.
use std::fmt::{Debug, Display};

use crate::error::{KeeperError, Result};

/// A parseable, strictly ordered version.
pub trait ReleaseVersion: Ord + Display + Clone + Debug {
    /// Parse a version label such as `1.2.0`.
    fn parse_version(input: &str) -> Result<Self>;
}

impl ReleaseVersion for semver::Version {
    fn parse_version(input: &str) -> Result<Self> {
        semver::Version::parse(input.trim())
            .map_err(|err| KeeperError::version_parse(input, err))
    }
}
