//! Traits related to remote git forges
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    error::Result,
    forge::{
        config::RemoteConfig,
        request::{CreatePrRequest, CreateReleaseRequest, PullRequest},
    },
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    /// Create a draft release and return its web URL.
    async fn create_draft_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<String>;
    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest>;
}
