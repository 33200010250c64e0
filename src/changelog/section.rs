//! Change categories and the line classifier used while parsing a record body.
use log::*;

/// One of the four change categories a record groups its items under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Added,
    Fixed,
    Changed,
    Removed,
}

impl Section {
    /// All sections in the order they are rendered.
    pub const ALL: [Section; 4] = [
        Section::Added,
        Section::Fixed,
        Section::Changed,
        Section::Removed,
    ];

    /// The exact marker line that opens this section.
    pub fn heading(self) -> &'static str {
        match self {
            Section::Added => "### Added",
            Section::Fixed => "### Fixed",
            Section::Changed => "### Changed",
            Section::Removed => "### Removed",
        }
    }

    /// Match a trimmed line against the section markers.
    pub fn from_heading(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.heading() == line)
    }
}

/// Where the parser currently is inside a record body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePhase {
    /// Before the first section marker. Lines seen here are dropped.
    #[default]
    Header,
    /// Collecting items for a section.
    In(Section),
}

impl ParsePhase {
    /// Feed one line to the classifier, returning the next phase and the
    /// item to record under that phase, if any.
    pub fn advance(self, line: &str) -> (ParsePhase, Option<String>) {
        let line = line.trim();

        if line.is_empty() {
            return (self, None);
        }

        if let Some(section) = Section::from_heading(line) {
            return (ParsePhase::In(section), None);
        }

        match self {
            ParsePhase::Header => {
                debug!("dropping line outside of any section: {line}");
                (self, None)
            }
            ParsePhase::In(_) => (self, Some(line.to_string())),
        }
    }

    /// The section items are currently collected for.
    pub fn section(self) -> Option<Section> {
        match self {
            ParsePhase::Header => None,
            ParsePhase::In(section) => Some(section),
        }
    }
}
