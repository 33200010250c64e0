//! A single changelog entry, pending or released.
use chrono::NaiveDate;
use std::fmt;

use crate::{
    changelog::section::{ParsePhase, Section},
    version::ReleaseVersion,
};

/// Label used for the pending entry header.
pub const UNRELEASED_LABEL: &str = "Unreleased";

/// Date format used in release headers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a record is still collecting changes or bound to a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStatus {
    Pending,
    Released,
}

/// One changelog entry with its four categorized change lists.
///
/// The status is derived from the version: a record without a version is
/// the pending (unreleased) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord<V> {
    version: Option<V>,
    date: Option<NaiveDate>,
    added: Vec<String>,
    fixed: Vec<String>,
    changed: Vec<String>,
    removed: Vec<String>,
}

impl<V: ReleaseVersion> ReleaseRecord<V> {
    pub fn new(version: Option<V>, date: Option<NaiveDate>) -> Self {
        Self {
            version,
            date,
            added: vec![],
            fixed: vec![],
            changed: vec![],
            removed: vec![],
        }
    }

    /// An empty pending record.
    pub fn pending() -> Self {
        Self::new(None, None)
    }

    pub fn status(&self) -> ReleaseStatus {
        if self.version.is_some() {
            ReleaseStatus::Released
        } else {
            ReleaseStatus::Pending
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status() == ReleaseStatus::Pending
    }

    pub fn version(&self) -> Option<&V> {
        self.version.as_ref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn items(&self, section: Section) -> &[String] {
        match section {
            Section::Added => &self.added,
            Section::Fixed => &self.fixed,
            Section::Changed => &self.changed,
            Section::Removed => &self.removed,
        }
    }

    pub fn push_item(&mut self, section: Section, item: impl Into<String>) {
        let items = match section {
            Section::Added => &mut self.added,
            Section::Fixed => &mut self.fixed,
            Section::Changed => &mut self.changed,
            Section::Removed => &mut self.removed,
        };
        items.push(item.into());
    }

    /// True when no section holds any item.
    pub fn is_empty(&self) -> bool {
        Section::ALL
            .into_iter()
            .all(|section| self.items(section).is_empty())
    }

    /// Classify the body lines of this record (header line excluded) into
    /// its sections. Items are appended to whatever the record already holds.
    pub fn parse<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phase = ParsePhase::default();

        for line in lines {
            let (next, item) = phase.advance(line.as_ref());
            if let (Some(section), Some(item)) = (next.section(), item) {
                self.push_item(section, item);
            }
            phase = next;
        }
    }

    /// The `## [...]` line that opens this record.
    pub fn header(&self) -> String {
        match (&self.version, self.date) {
            (None, _) => format!("## [{UNRELEASED_LABEL}]"),
            (Some(version), None) => format!("## [{version}]"),
            (Some(version), Some(date)) => {
                format!("## [{version}] - {}", date.format(DATE_FORMAT))
            }
        }
    }

    /// Render the document fragment for this record.
    ///
    /// Pending records always show every section heading so there is a place
    /// to add new entries. Released records only show populated sections.
    pub fn render(&self) -> String {
        let mut text = format!("{}\n\n", self.header());
        let is_pending = self.is_pending();

        for section in Section::ALL {
            let items = self.items(section);

            if is_pending || !items.is_empty() {
                text.push_str(section.heading());
                text.push_str("\n\n");
            }

            if !items.is_empty() {
                text.push_str(&items.join("\n"));
                text.push_str("\n\n");
            }
        }

        text
    }

    /// Rendered record without trailing blank lines, used as release notes.
    pub fn notes(&self) -> String {
        self.render().trim_end().to_string()
    }

    pub(crate) fn mark_released(&mut self, version: V, date: Option<NaiveDate>) {
        self.version = Some(version);
        self.date = date;
    }
}

impl<V: ReleaseVersion> fmt::Display for ReleaseRecord<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
