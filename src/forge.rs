//! Remote hosting platform used to publish a release.
//!
//! The release workflow only needs two calls from the forge: create a draft
//! release for a tag and open pull requests for the release branch.

/// Connection settings and token for the remote repository.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// Request and response types shared by forge implementations.
pub mod request;

/// Forge abstraction used by the release workflow.
pub mod traits;
