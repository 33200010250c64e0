#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a draft release for an existing or pending tag.
pub struct CreateReleaseRequest {
    pub tag: String,
    /// Branch the tag is created from when it does not exist yet.
    pub target: String,
    pub name: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a new pull request.
pub struct CreatePrRequest {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pull request created on the forge.
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}
