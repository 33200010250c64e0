//! Keep a Changelog document model.
//!
//! A changelog is read into an ordered list of [`ReleaseRecord`]s: the single
//! pending `## [Unreleased]` entry first, then releases newest to oldest.
//! The list can promote the pending entry into a release and be written back
//! in the exact same format, followed by a `---` delimiter and a generated
//! block of comparison links between consecutive tags.

/// Parsed changelog file and the release operation.
pub mod document;

/// Footer comparison link generation.
pub mod links;

/// A single pending or released entry.
pub mod record;

/// Section markers and the body line classifier.
pub mod section;

pub use document::{Changelog, ChangelogDocument, DELIMITER, FILE_HEADER};
pub use links::{CompareLinks, DEFAULT_TAG_PREFIX, detect_base_url};
pub use record::{ReleaseRecord, ReleaseStatus};
pub use section::{ParsePhase, Section};
