use semver::Version;
use std::fmt;
use tempfile::TempDir;

use crate::changelog::section::Section;

use super::*;

const BASE: &str = "https://github.com/owner/repo";

fn links() -> CompareLinks {
    CompareLinks::new(BASE, "v")
}

fn fixture() -> String {
    format!(
        "{FILE_HEADER}\
## [Unreleased]\n\n\
### Added\n\n\
- Pending feature\n\n\
### Fixed\n\n\
### Changed\n\n\
### Removed\n\n\
## [1.2.0] - 2024-01-01\n\n\
### Added\n\n\
- Thing\n\n\
## [1.0.0] - 2023-06-15\n\n\
### Fixed\n\n\
- Bug\n\n\
### Removed\n\n\
- Old API\n\n\
---\n\
[unreleased]: {BASE}/compare/v1.2.0...HEAD\n\
[1.2.0]: {BASE}/compare/v1.0.0...v1.2.0\n\
[1.0.0]: {BASE}/releases/tag/v1.0.0\n"
    )
}

fn load_fixture() -> Changelog {
    Changelog::parse(&fixture(), links()).unwrap()
}

fn version(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn count_pending(doc: &Changelog) -> usize {
    doc.records().iter().filter(|r| r.is_pending()).count()
}

#[test]
fn round_trips_well_formed_document() {
    let doc = load_fixture();
    assert_eq!(doc.render(), fixture());
}

#[test]
fn round_trips_pending_only_document() {
    let text = format!(
        "{FILE_HEADER}## [Unreleased]\n\n### Added\n\n### Fixed\n\n### Changed\n\n### Removed\n\n---\n"
    );
    let doc = Changelog::parse(&text, links()).unwrap();
    assert_eq!(doc.render(), text);
    assert!(doc.format_diff_text().is_empty());
}

#[test]
fn parses_records_in_document_order() {
    let doc = load_fixture();
    let records = doc.records();

    assert_eq!(records.len(), 3);
    assert!(records[0].is_pending());
    assert_eq!(records[0].items(Section::Added), ["- Pending feature"]);
    assert_eq!(records[1].version(), Some(&version("1.2.0")));
    assert_eq!(records[2].version(), Some(&version("1.0.0")));
    assert_eq!(records[2].items(Section::Fixed), ["- Bug"]);
    assert_eq!(records[2].items(Section::Removed), ["- Old API"]);
}

#[test]
fn pending_only_document_has_no_latest_version() {
    let text = format!("{FILE_HEADER}## [Unreleased]\n");
    let doc = Changelog::parse(&text, links()).unwrap();

    assert_eq!(doc.records().len(), 1);
    assert!(doc.latest_released_version().is_none());
}

#[test]
fn parses_single_released_record() {
    let text = "## [1.2.0] - 2024-01-01\n### Added\n- Thing\n---\n";
    let doc = Changelog::parse(text, links()).unwrap();

    assert_eq!(doc.records().len(), 1);
    let record = &doc.records()[0];
    assert_eq!(record.version(), Some(&version("1.2.0")));
    assert_eq!(
        record.date(),
        Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    );
    assert_eq!(record.items(Section::Added), ["- Thing"]);
}

#[test]
fn stops_scanning_at_delimiter() {
    let text = "## [Unreleased]\n### Added\n- Real\n---\n## [9.9.9] - 2030-01-01\n### Added\n- Not a record\n";
    let doc = Changelog::parse(text, links()).unwrap();

    assert_eq!(doc.records().len(), 1);
    assert_eq!(doc.records()[0].items(Section::Added), ["- Real"]);
}

#[test]
fn drops_body_lines_before_first_section() {
    let text = "## [1.0.0]\nSome prose about the release\n### Changed\n- Kept\n";
    let doc = Changelog::parse(text, links()).unwrap();

    let record = &doc.records()[0];
    assert!(record.date().is_none());
    assert_eq!(record.items(Section::Changed), ["- Kept"]);
    assert_eq!(record.render(), "## [1.0.0]\n\n### Changed\n\n- Kept\n\n");
}

#[test]
fn rejects_unparseable_version_label() {
    let text = "## [Unreleased]\n## [next-big-thing]\n### Added\n- x\n";
    let result = Changelog::parse(text, links());
    assert!(matches!(result, Err(KeeperError::VersionParse { .. })));
}

#[test]
fn rejects_impossible_header_date() {
    let text = "## [1.0.0] - 2024-13-40\n";
    let result = Changelog::parse(text, links());
    assert!(matches!(result, Err(KeeperError::InvalidDate(_))));
}

#[test]
fn latest_released_version_follows_pending() {
    let doc = load_fixture();
    assert_eq!(doc.latest_released_version(), Some(&version("1.2.0")));
}

#[test]
fn finds_release_by_version() {
    let doc = load_fixture();

    let record = doc.find_release(&version("1.2.0")).unwrap();
    assert_eq!(record.items(Section::Added), ["- Thing"]);
    assert!(doc.find_release(&version("5.0.0")).is_none());
}

#[test_log::test]
fn release_promotes_pending_and_inserts_fresh_one() {
    let mut doc = load_fixture();

    doc.release_latest("1.3.0", "2024-02-01").unwrap();

    let records = doc.records();
    assert_eq!(records.len(), 4);
    assert!(records[0].is_pending());
    assert!(records[0].is_empty());
    assert_eq!(records[1].version(), Some(&version("1.3.0")));
    assert_eq!(records[1].items(Section::Added), ["- Pending feature"]);
    assert_eq!(records[1].header(), "## [1.3.0] - 2024-02-01");
    assert_eq!(doc.latest_released_version(), Some(&version("1.3.0")));

    let links = doc.format_diff_text();
    assert!(links.contains(&format!(
        "[1.3.0]: {BASE}/compare/v1.2.0...v1.3.0"
    )));
    assert!(links.contains(&format!(
        "[unreleased]: {BASE}/compare/v1.3.0...HEAD"
    )));
}

#[test_log::test]
fn release_below_previous_version_leaves_document_unchanged() {
    let mut doc = load_fixture();
    let before = doc.clone();

    let result = doc.release_latest("1.1.0", "2024-02-01");

    assert!(matches!(
        result,
        Err(KeeperError::NonMonotonicVersion { ref requested, ref previous })
            if requested == "1.1.0" && previous == "1.2.0"
    ));
    assert_eq!(doc, before);
}

#[test]
fn release_equal_to_previous_version_is_rejected() {
    let mut doc = load_fixture();
    let before = doc.clone();

    let result = doc.release_latest("1.2.0", "2024-02-01");

    assert!(matches!(
        result,
        Err(KeeperError::NonMonotonicVersion { .. })
    ));
    assert_eq!(doc, before);
}

#[test]
fn release_without_pending_record_is_rejected() {
    let text = "## [1.2.0] - 2024-01-01\n### Added\n- Thing\n";
    let mut doc = Changelog::parse(text, links()).unwrap();
    let before = doc.clone();

    let result = doc.release_latest("1.3.0", "2024-02-01");

    assert!(matches!(result, Err(KeeperError::AlreadyReleased)));
    assert_eq!(doc, before);
}

#[test]
fn release_on_empty_document_is_rejected() {
    let mut doc = Changelog::from_records(vec![], links());
    let result = doc.release_latest("0.1.0", "");
    assert!(matches!(result, Err(KeeperError::AlreadyReleased)));
    assert!(doc.records().is_empty());
}

#[test]
fn release_with_malformed_version_is_rejected() {
    let mut doc = load_fixture();
    let before = doc.clone();

    let result = doc.release_latest("one point three", "2024-02-01");

    assert!(matches!(result, Err(KeeperError::VersionParse { .. })));
    assert_eq!(doc, before);
}

#[test]
fn release_with_malformed_date_is_rejected() {
    let mut doc = load_fixture();
    let before = doc.clone();

    let result = doc.release_latest("1.3.0", "02/01/2024");

    assert!(matches!(result, Err(KeeperError::InvalidDate(_))));
    assert_eq!(doc, before);
}

#[test]
fn release_with_blank_date_omits_date() {
    let mut doc = load_fixture();
    doc.release_latest("1.3.0", "  ").unwrap();
    assert_eq!(doc.records()[1].header(), "## [1.3.0]");
}

#[test]
fn second_release_targets_the_new_pending_record() {
    let mut doc = load_fixture();

    doc.release_latest("1.3.0", "2024-02-01").unwrap();
    doc.release_latest("1.4.0", "2024-02-02").unwrap();

    let records = doc.records();
    assert_eq!(count_pending(&doc), 1);
    assert!(records[0].is_pending());
    assert_eq!(records[1].version(), Some(&version("1.4.0")));
    assert!(records[1].is_empty());
    assert_eq!(records[2].version(), Some(&version("1.3.0")));
    assert_eq!(records[2].items(Section::Added), ["- Pending feature"]);
}

#[test]
fn increasing_releases_succeed_until_one_goes_backwards() {
    let mut doc = Changelog::new(links());

    for v in ["0.1.0", "0.2.0", "0.10.0", "1.0.0-rc.1", "1.0.0"] {
        doc.release_latest(v, "2024-03-01").unwrap();
        assert_eq!(count_pending(&doc), 1);
        assert!(doc.records()[0].is_pending());
    }

    let before = doc.clone();
    let result = doc.release_latest("0.10.0", "2024-03-02");

    assert!(matches!(
        result,
        Err(KeeperError::NonMonotonicVersion { .. })
    ));
    assert_eq!(doc, before);
    assert_eq!(doc.records().len(), 6);
}

#[test]
fn rendering_twice_is_identical() {
    let mut doc = load_fixture();
    doc.release_latest("2.0.0", "2024-05-05").unwrap();
    assert_eq!(doc.render(), doc.render());
}

#[test]
fn released_document_parses_back_to_the_same_records() {
    let mut doc = load_fixture();
    doc.release_latest("1.3.0", "2024-02-01").unwrap();

    let reparsed = Changelog::parse(&doc.render(), links()).unwrap();
    assert_eq!(reparsed, doc);
}

#[test]
fn load_reports_missing_file() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("Changelog.md");

    let result = Changelog::load(&path, links());

    assert!(matches!(result, Err(KeeperError::NotFound(ref p)) if *p == path));
}

#[test]
fn save_then_load_preserves_document() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("Changelog.md");
    fs::write(&path, fixture()).unwrap();

    let mut doc = Changelog::load(&path, links()).unwrap();
    doc.release_latest("1.3.0", "2024-02-01").unwrap();
    doc.save(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, doc.render());
    assert!(written.contains("## [1.3.0] - 2024-02-01\n\n### Added\n\n- Pending feature\n\n"));
    assert!(written.starts_with(&format!("{FILE_HEADER}## [Unreleased]\n")));

    let reloaded = Changelog::load(&path, links()).unwrap();
    assert_eq!(reloaded, doc);
}

/// Build counter used to check the document works with any version type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Build(u32);

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "build{}", self.0)
    }
}

impl ReleaseVersion for Build {
    fn parse_version(input: &str) -> Result<Self> {
        input
            .strip_prefix("build")
            .and_then(|n| n.parse().ok())
            .map(Build)
            .ok_or_else(|| KeeperError::version_parse(input, "expected buildN"))
    }
}

#[test]
fn works_with_injected_version_type() {
    let text = "## [Unreleased]\n### Fixed\n- Thing\n## [build7]\n### Added\n- Seven\n";
    let mut doc =
        ChangelogDocument::<Build>::parse(text, CompareLinks::new(BASE, ""))
            .unwrap();

    assert_eq!(doc.latest_released_version(), Some(&Build(7)));

    let result = doc.release_latest("build3", "");
    assert!(matches!(
        result,
        Err(KeeperError::NonMonotonicVersion { .. })
    ));

    doc.release_latest("build12", "").unwrap();
    assert_eq!(
        doc.format_diff_text(),
        vec![
            format!("[unreleased]: {BASE}/compare/build12...HEAD"),
            format!("[build12]: {BASE}/compare/build7...build12"),
            format!("[build7]: {BASE}/releases/tag/build7"),
        ]
    );
}
