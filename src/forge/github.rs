//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;

use crate::{
    error::Result,
    forge::{
        config::RemoteConfig,
        request::{CreatePrRequest, CreateReleaseRequest, PullRequest},
        traits::Forge,
    },
};

/// GitHub forge implementation using Octocrab for draft releases and pull
/// requests.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub async fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_base_uri();
        debug!("using github api: {base_uri}");

        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri)?
            .build()?;

        Ok(Self { config, instance })
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn create_draft_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<String> {
        info!("creating draft release: {}", req.tag);

        let release = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(&req.tag)
            .target_commitish(&req.target)
            .name(&req.name)
            .body(&req.notes)
            .draft(true)
            .prerelease(false)
            .send()
            .await?;

        Ok(release.html_url.to_string())
    }

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        info!(
            "creating pull request: {} -> {}",
            req.head_branch, req.base_branch
        );

        let pr = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await?;

        Ok(PullRequest {
            number: pr.number,
            url: pr.html_url.map(|url| url.to_string()).unwrap_or_default(),
        })
    }
}
