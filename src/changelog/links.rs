//! Comparison links rendered below the changelog delimiter.
use regex::Regex;
use std::{fmt::Display, sync::LazyLock};

use crate::{changelog::record::ReleaseRecord, version::ReleaseVersion};

/// Default prefix prepended to versions to form tag names.
pub const DEFAULT_TAG_PREFIX: &str = "v";

static FOOTER_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\]]+\]: (\S+?)/(?:compare|releases/tag)/\S+$").unwrap()
});

/// Base URL used by an existing link block, if the text has one.
pub fn detect_base_url(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        FOOTER_LINK_REGEX
            .captures(line.trim_end())
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Builds the reference links that map each version to a tag or a
/// comparison between consecutive tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareLinks {
    base_url: String,
    tag_prefix: String,
}

impl Default for CompareLinks {
    fn default() -> Self {
        Self {
            base_url: "".into(),
            tag_prefix: DEFAULT_TAG_PREFIX.into(),
        }
    }
}

impl CompareLinks {
    /// `base_url` is the repository web URL, e.g.
    /// `https://github.com/owner/repo`.
    pub fn new(
        base_url: impl Into<String>,
        tag_prefix: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tag_prefix: tag_prefix.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Tag name for a version, e.g. `v1.2.0`.
    pub fn tag(&self, version: &impl Display) -> String {
        format!("{}{}", self.tag_prefix, version)
    }

    fn release_link(&self, version: &impl Display) -> String {
        format!(
            "[{version}]: {}/releases/tag/{}",
            self.base_url,
            self.tag(version)
        )
    }

    fn compare_link(
        &self,
        previous: &impl Display,
        version: &impl Display,
    ) -> String {
        format!(
            "[{version}]: {}/compare/{}...{}",
            self.base_url,
            self.tag(previous),
            self.tag(version)
        )
    }

    fn unreleased_link(&self, latest: &impl Display) -> String {
        format!(
            "[unreleased]: {}/compare/{}...HEAD",
            self.base_url,
            self.tag(latest)
        )
    }

    /// Produce the link block for records ordered newest first.
    ///
    /// Records are walked oldest first: the oldest release links to its tag,
    /// every later release compares against the release before it, and the
    /// pending record compares the latest release against `HEAD`. The result
    /// is returned newest first.
    pub fn format<V: ReleaseVersion>(
        &self,
        records: &[ReleaseRecord<V>],
    ) -> Vec<String> {
        let mut links = vec![];
        let mut previous: Option<&V> = None;

        for record in records.iter().rev() {
            match (record.version(), previous) {
                (Some(version), None) => {
                    links.push(self.release_link(version))
                }
                (Some(version), Some(prev)) => {
                    links.push(self.compare_link(prev, version))
                }
                (None, Some(prev)) => links.push(self.unreleased_link(prev)),
                (None, None) => {}
            }

            if let Some(version) = record.version() {
                previous = Some(version);
            }
        }

        links.reverse();
        links
    }
}
