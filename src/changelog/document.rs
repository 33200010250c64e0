//! The changelog file as an ordered list of release records.
use chrono::NaiveDate;
use log::*;
use regex::Regex;
use std::{fs, path::Path, sync::LazyLock};

use crate::{
    changelog::{
        links::CompareLinks,
        record::{DATE_FORMAT, ReleaseRecord, UNRELEASED_LABEL},
    },
    error::{KeeperError, Result},
    version::ReleaseVersion,
};

/// Fixed preamble written at the top of every changelog.
pub const FILE_HEADER: &str = "# Changelog\n\n\
All notable changes to this project will be documented in this file.\n\n\
The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.1.0/),\n\
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).\n\n";

/// Line separating the records from the generated comparison links.
pub const DELIMITER: &str = "---";

static RECORD_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[(.*)\](?: - (\d{4}-\d{2}-\d{2}))?$").unwrap()
});

/// Header and body lines of the record currently being scanned.
struct OpenRecord<'a> {
    label: &'a str,
    date: Option<&'a str>,
    body: Vec<&'a str>,
}

/// Ordered collection of release records, pending entry first, then
/// releases from newest to oldest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument<V = semver::Version> {
    records: Vec<ReleaseRecord<V>>,
    links: CompareLinks,
}

/// Changelog using semantic versions.
pub type Changelog = ChangelogDocument<semver::Version>;

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| KeeperError::InvalidDate(input.to_string()))
}

impl<V: ReleaseVersion> ChangelogDocument<V> {
    /// A document holding a single empty pending record.
    pub fn new(links: CompareLinks) -> Self {
        Self::from_records(vec![ReleaseRecord::pending()], links)
    }

    pub fn from_records(
        records: Vec<ReleaseRecord<V>>,
        links: CompareLinks,
    ) -> Self {
        Self { records, links }
    }

    /// Read and parse the changelog at `path`.
    pub fn load(path: &Path, links: CompareLinks) -> Result<Self> {
        if !path.exists() {
            error!("changelog file not found at {}", path.display());
            return Err(KeeperError::NotFound(path.to_path_buf()));
        }

        debug!("loading changelog: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content, links)
    }

    /// Reconstruct records from changelog text.
    ///
    /// Records are kept in document order. Scanning stops at the delimiter so
    /// the link block is never read as record content.
    pub fn parse(content: &str, links: CompareLinks) -> Result<Self> {
        let mut records = vec![];
        let mut open: Option<OpenRecord> = None;

        for line in content.lines() {
            let line = line.trim_end();

            if line == DELIMITER {
                break;
            }

            if let Some(captures) = RECORD_HEADER_REGEX.captures(line) {
                if let Some(previous) = open.take() {
                    records.push(Self::finalize(previous)?);
                }

                open = Some(OpenRecord {
                    label: captures.get(1).map_or("", |m| m.as_str()),
                    date: captures.get(2).map(|m| m.as_str()),
                    body: vec![],
                });

                continue;
            }

            if let Some(record) = open.as_mut() {
                record.body.push(line.trim());
            }
        }

        if let Some(last) = open {
            records.push(Self::finalize(last)?);
        }

        debug!("parsed {} changelog records", records.len());

        Ok(Self { records, links })
    }

    fn finalize(open: OpenRecord) -> Result<ReleaseRecord<V>> {
        let version = if open.label == UNRELEASED_LABEL {
            None
        } else {
            Some(V::parse_version(open.label)?)
        };

        let date = open.date.map(parse_date).transpose()?;

        let mut record = ReleaseRecord::new(version, date);
        record.parse(open.body);
        Ok(record)
    }

    pub fn records(&self) -> &[ReleaseRecord<V>] {
        &self.records
    }

    /// Newest released version, or `None` if nothing was ever released.
    pub fn latest_released_version(&self) -> Option<&V> {
        self.records.iter().find_map(|record| record.version())
    }

    /// The released record for `version`.
    pub fn find_release(&self, version: &V) -> Option<&ReleaseRecord<V>> {
        self.records
            .iter()
            .find(|record| record.version() == Some(version))
    }

    /// Comparison links for the footer, newest first.
    pub fn format_diff_text(&self) -> Vec<String> {
        self.links.format(&self.records)
    }

    /// Render the complete document text.
    pub fn render(&self) -> String {
        let mut text = FILE_HEADER.to_string();

        for record in self.records.iter() {
            text.push_str(&record.render());
        }

        text.push_str(DELIMITER);
        text.push('\n');

        for link in self.format_diff_text() {
            text.push_str(&link);
            text.push('\n');
        }

        text
    }

    /// Write the rendered document to `path`, replacing its contents.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        info!("saved changelog: {}", path.display());
        Ok(())
    }

    /// Promote the pending record to a release and open a fresh pending
    /// record in front of it.
    ///
    /// A blank `date_of_release` releases without a date. Nothing is modified
    /// when any precondition fails.
    pub fn release_latest(
        &mut self,
        version_to_release: &str,
        date_of_release: &str,
    ) -> Result<()> {
        let version = V::parse_version(version_to_release)
            .inspect_err(|err| error!("{err}"))?;

        let date = match date_of_release.trim() {
            "" => None,
            date => Some(parse_date(date).inspect_err(|err| error!("{err}"))?),
        };

        if let Some(previous) =
            self.records.get(1).and_then(|record| record.version())
            && version <= *previous
        {
            let err = KeeperError::NonMonotonicVersion {
                requested: version.to_string(),
                previous: previous.to_string(),
            };
            error!("{err}");
            return Err(err);
        }

        let Some(pending) =
            self.records.first_mut().filter(|record| record.is_pending())
        else {
            let err = KeeperError::AlreadyReleased;
            error!("{err}");
            return Err(err);
        };

        if pending.is_empty() {
            warn!("releasing {version} with no recorded changes");
        }

        info!("releasing unreleased changes as {version}");
        pending.mark_released(version, date);

        self.records.insert(0, ReleaseRecord::pending());

        Ok(())
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
